use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    problem::station_graph::StationGraph,
    route::route_decoder::SlotConflictPolicy,
    solver::solver_params::SolverParams,
    threshold::{station_needs::StationNeeds, threshold_analyzer::ThresholdPolicy},
};

/// How the constraint weight of the tour QUBO is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LagrangeStrategy {
    Fixed(f64),
    /// Derived from the depot's travel costs, see
    /// [`StationGraph::suggested_lagrange`].
    #[default]
    Suggested,
}

impl LagrangeStrategy {
    pub fn resolve(&self, graph: &StationGraph) -> f64 {
        match self {
            LagrangeStrategy::Fixed(lagrange) => *lagrange,
            LagrangeStrategy::Suggested => graph.suggested_lagrange(),
        }
    }
}

/// Where the supply and demand tags of the planned graph come from.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TagSource {
    /// Every station in the snapshot is re-tagged from its need.
    Needs,
    /// The depot's tags are used as given, the needs only decide whether to
    /// plan at all.
    Explicit,
    /// Untagged stations are tagged from their need, tagged ones keep their
    /// tag.
    #[default]
    NeedsForUntagged,
}

impl TagSource {
    pub fn apply(&self, graph: &StationGraph, needs: &StationNeeds) -> StationGraph {
        match self {
            TagSource::Needs => graph.with_needs(needs),
            TagSource::Explicit => graph.clone(),
            TagSource::NeedsForUntagged => graph.with_needs_for_untagged(needs),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlannerParams {
    pub thresholds: ThresholdPolicy,
    pub lagrange: LagrangeStrategy,
    pub tagging: TagSource,
    pub solver: SolverParams,
    pub conflict_policy: SlotConflictPolicy,
}
