use std::path::PathBuf;

use clap::{Args, ValueEnum};
use comfy_table::Table;
use serde::Serialize;
use tracing::{error, info};
use velo_optimizer::{
    error::{ErrorKind, RebalanceError},
    planner::{
        planner_params::LagrangeStrategy, rebalance_plan::RebalancePlan,
        rebalance_planner::RebalancePlanner,
    },
    threshold::threshold_analyzer::ThresholdPolicy,
};
use velo_samplers::{sampler_client::SamplerClient, sampler_provider::SamplerProvider};

use crate::{file_utils::read_problem, parsers};

#[derive(Clone, Copy, ValueEnum)]
enum SamplerKind {
    Exhaustive,
    SimulatedAnnealing,
    Remote,
}

impl From<SamplerKind> for SamplerProvider {
    fn from(kind: SamplerKind) -> Self {
        match kind {
            SamplerKind::Exhaustive => SamplerProvider::Exhaustive {
                max_variables: None,
            },
            SamplerKind::SimulatedAnnealing => {
                SamplerProvider::SimulatedAnnealing { num_sweeps: None }
            }
            SamplerKind::Remote => SamplerProvider::Remote { endpoint: None },
        }
    }
}

#[derive(Args)]
pub struct PlanArgs {
    /// Rebalancing problem, see the `schema` command
    input: PathBuf,

    /// Deadline for each sampler call (e.g., "30s", "5m", "PT1H30M")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    timeout: Option<jiff::SignedDuration>,

    #[arg(short, long)]
    lagrange: Option<f64>,

    #[arg(long)]
    floor: Option<u32>,

    #[arg(long)]
    ceiling: Option<u32>,

    /// Number of reads requested from the sampler
    #[arg(short, long)]
    reads: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the sampler of the problem file
    #[arg(short, long, value_enum)]
    sampler: Option<SamplerKind>,

    /// Print plans as JSON instead of tables
    #[arg(long)]
    json: bool,
}

pub async fn run(args: PlanArgs) -> Result<(), anyhow::Error> {
    let mut problem = read_problem(&args.input)?;
    let mut params = problem.planner_params()?;

    if args.floor.is_some() || args.ceiling.is_some() {
        params.thresholds = ThresholdPolicy::new(
            args.floor.unwrap_or(params.thresholds.floor()),
            args.ceiling.unwrap_or(params.thresholds.ceiling()),
        )?;
    }
    if let Some(lagrange) = args.lagrange {
        params.lagrange = LagrangeStrategy::Fixed(lagrange);
    }
    if let Some(timeout) = args.timeout {
        params.solver.timeout = Some(timeout);
    }
    if let Some(reads) = args.reads {
        params.solver.num_reads = reads;
    }
    if args.seed.is_some() {
        params.solver.seed = args.seed;
    }

    let provider = args
        .sampler
        .map(SamplerProvider::from)
        .or_else(|| problem.sampler.take())
        .unwrap_or_default();
    let planner = RebalancePlanner::new(SamplerClient::new(provider)?, params);

    let depots = problem.build_depots()?;
    info!(depots = depots.len(), "Planning rebalancing");

    let results = planner.plan_all(&depots).await;
    let names = depots
        .iter()
        .enumerate()
        .map(|(position, depot)| {
            depot
                .id()
                .map(str::to_owned)
                .unwrap_or_else(|| format!("#{position}"))
        })
        .collect::<Vec<_>>();

    let mut failures = 0;
    for (name, err) in names
        .iter()
        .zip(&results)
        .filter_map(|(name, result)| Some((name, result.as_ref().err()?)))
    {
        failures += 1;
        error!(depot = %name, kind = ?err.kind(), "{err}");
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&depot_outcomes(&names, &results))?
        );
    } else {
        println!("{}", plan_table(&names, &results));
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} depots could not be planned", depots.len());
    }

    Ok(())
}

#[derive(Serialize)]
struct DepotOutcome<'a> {
    depot: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<&'a RebalancePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<DepotFailure>,
}

#[derive(Serialize)]
struct DepotFailure {
    kind: ErrorKind,
    message: String,
}

/// One labelled entry per depot, in input order.
fn depot_outcomes<'a>(
    names: &'a [String],
    results: &'a [Result<RebalancePlan, RebalanceError>],
) -> Vec<DepotOutcome<'a>> {
    names
        .iter()
        .zip(results)
        .map(|(name, result)| match result {
            Ok(plan) => DepotOutcome {
                depot: name,
                plan: Some(plan),
                error: None,
            },
            Err(err) => DepotOutcome {
                depot: name,
                plan: None,
                error: Some(DepotFailure {
                    kind: err.kind(),
                    message: err.to_string(),
                }),
            },
        })
        .collect()
}

fn plan_table(names: &[String], results: &[Result<RebalancePlan, RebalanceError>]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Depot", "Status", "Route", "Travel cost", "Energy"]);

    for (name, result) in names.iter().zip(results) {
        match result {
            Ok(RebalancePlan::NotRequired) => {
                table.add_row(vec![name.clone(), String::from("balanced")]);
            }
            Ok(RebalancePlan::Dispatch(dispatch)) => {
                let route = dispatch
                    .route
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" -> ");
                table.add_row(vec![
                    name.clone(),
                    String::from("dispatch"),
                    route,
                    format!("{:.1}", dispatch.travel_cost),
                    format!("{:.1}", dispatch.energy),
                ]);
            }
            Err(err) => {
                table.add_row(vec![name.clone(), format!("failed: {err}")]);
            }
        }
    }

    table
}
