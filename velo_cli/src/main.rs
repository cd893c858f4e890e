use clap::{Parser, Subcommand};

use crate::{analyze::AnalyzeArgs, plan::PlanArgs};

mod analyze;
mod file_utils;
mod parsers;
mod plan;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Checks bike counts against the station thresholds
    Analyze {
        #[command(flatten)]
        args: AnalyzeArgs,
    },
    /// Plans a rebalancing route for every depot that needs one
    #[command(visible_alias = "p")]
    Plan {
        #[command(flatten)]
        args: PlanArgs,
    },
    /// Prints the JSON schema of problem files
    Schema,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze { args } => analyze::run(args)?,
        Commands::Plan { args } => plan::run(args).await?,
        Commands::Schema => {
            println!("{}", velo_optimizer::json::schema::generate_json_schema()?)
        }
    }

    Ok(())
}
