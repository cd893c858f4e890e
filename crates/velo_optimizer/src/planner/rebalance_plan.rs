use serde::Serialize;

use crate::{
    problem::{station::StationId, travel_cost_matrix::Cost},
    threshold::station_needs::StationNeeds,
};

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RebalancePlan {
    /// Every station is within thresholds, nothing to dispatch.
    NotRequired,
    Dispatch(Dispatch),
}

impl RebalancePlan {
    pub fn dispatch(&self) -> Option<&Dispatch> {
        match self {
            RebalancePlan::Dispatch(dispatch) => Some(dispatch),
            RebalancePlan::NotRequired => None,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub target: Option<u32>,
    pub needs: StationNeeds,
    /// Stations in visiting order. The vehicle returns to the first one.
    pub route: Vec<StationId>,
    /// Sampler energy of the route, rebalancing penalty included.
    pub energy: f64,
    pub travel_cost: Cost,
}
