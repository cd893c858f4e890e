use std::path::PathBuf;

use clap::Args;
use comfy_table::Table;
use tracing::info;
use velo_optimizer::threshold::threshold_analyzer::{ThresholdAnalyzer, ThresholdPolicy};

use crate::file_utils::read_problem;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Rebalancing problem, see the `schema` command
    input: PathBuf,

    #[arg(long)]
    floor: Option<u32>,

    #[arg(long)]
    ceiling: Option<u32>,
}

pub fn run(args: AnalyzeArgs) -> Result<(), anyhow::Error> {
    let problem = read_problem(&args.input)?;
    let defaults = problem.planner_params()?.thresholds;
    let policy = ThresholdPolicy::new(
        args.floor.unwrap_or(defaults.floor()),
        args.ceiling.unwrap_or(defaults.ceiling()),
    )?;
    let analyzer = ThresholdAnalyzer::new(policy);

    for (position, depot) in problem.build_depots()?.iter().enumerate() {
        let name = depot
            .id()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("#{position}"));
        let report = analyzer.analyze(depot.snapshot())?;

        if !report.violated {
            info!(
                depot = %name,
                "All stations within [{}, {}]",
                policy.floor(),
                policy.ceiling()
            );
            continue;
        }

        let mut table = Table::new();
        table.set_header(vec!["Station", "Bikes", "Need", "Out of bounds"]);
        for (station, count) in depot.snapshot().iter() {
            table.add_row(vec![
                station.to_string(),
                count.to_string(),
                report.needs.get(station).unwrap_or_default().to_string(),
                String::from(if report.violations.contains(station) {
                    "yes"
                } else {
                    ""
                }),
            ]);
        }

        println!(
            "Depot {name}: {} stations out of bounds, target {}",
            report.violations.len(),
            report.target.unwrap_or_default()
        );
        println!("{table}");
    }

    Ok(())
}
