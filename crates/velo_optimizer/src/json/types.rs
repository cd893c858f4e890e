use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use velo_samplers::sampler_provider::SamplerProvider;

use crate::{
    planner::{
        depot::Depot,
        planner_params::{LagrangeStrategy, PlannerParams, TagSource},
    },
    problem::{
        location::Location,
        station::{StationBuilder, StationId},
        station_graph::{Edge, GraphError, StationGraph},
    },
    route::route_decoder::SlotConflictPolicy,
    threshold::{
        bike_count_snapshot::BikeCountSnapshot,
        threshold_analyzer::{ThresholdError, ThresholdPolicy},
    },
};

#[derive(Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "RebalanceProblem")]
pub struct JsonRebalanceProblem {
    pub depots: Vec<JsonDepot>,
    pub thresholds: Option<JsonThresholds>,
    /// Constraint weight of the tour QUBO. Derived from travel costs when
    /// omitted.
    pub lagrange: Option<f64>,
    /// Whether station `supply` / `demand` fields or the bike counts decide
    /// the stations' roles. Counts only fill in untagged stations when
    /// omitted.
    pub tagging: Option<TagSource>,
    pub sampler: Option<SamplerProvider>,
    pub conflict_policy: Option<SlotConflictPolicy>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Copy)]
#[serde(deny_unknown_fields, rename = "Thresholds")]
pub struct JsonThresholds {
    pub floor: u32,
    pub ceiling: u32,
}

#[derive(Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Depot")]
pub struct JsonDepot {
    pub id: Option<String>,
    pub stations: Vec<JsonStation>,
    /// Travel costs between stations. When omitted, stations need
    /// coordinates and the great-circle distance is used.
    pub edges: Option<Vec<JsonEdge>>,
    /// Station the vehicle leaves from.
    pub start: Option<StationId>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Station")]
pub struct JsonStation {
    pub id: StationId,
    pub bikes: u32,
    pub supply: Option<u32>,
    pub demand: Option<u32>,
    /// `[longitude, latitude]`
    pub coordinates: Option<[f64; 2]>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Edge")]
pub struct JsonEdge {
    pub from: StationId,
    pub to: StationId,
    pub weight: f64,
}

impl JsonRebalanceProblem {
    /// Planner configuration carried by the document, on top of the
    /// defaults.
    pub fn planner_params(&self) -> Result<PlannerParams, ThresholdError> {
        let mut params = PlannerParams::default();

        if let Some(thresholds) = self.thresholds {
            params.thresholds = ThresholdPolicy::new(thresholds.floor, thresholds.ceiling)?;
        }

        if let Some(lagrange) = self.lagrange {
            params.lagrange = LagrangeStrategy::Fixed(lagrange);
        }

        if let Some(tagging) = self.tagging {
            params.tagging = tagging;
        }

        if let Some(conflict_policy) = self.conflict_policy {
            params.conflict_policy = conflict_policy;
        }

        Ok(params)
    }

    pub fn build_depots(self) -> Result<Vec<Depot>, GraphError> {
        self.depots.into_iter().map(JsonDepot::build_depot).collect()
    }
}

impl JsonDepot {
    #[instrument(skip_all, level = "debug", fields(depot = self.id.as_deref().unwrap_or_default()))]
    pub fn build_depot(self) -> Result<Depot, GraphError> {
        let snapshot = self
            .stations
            .iter()
            .map(|station| (station.id.clone(), station.bikes))
            .collect::<BikeCountSnapshot>();

        let stations = self
            .stations
            .into_iter()
            .map(|station| {
                let mut builder = StationBuilder::default();

                builder.set_id(station.id);

                if let Some(supply) = station.supply {
                    builder.set_supply(supply);
                }

                if let Some(demand) = station.demand {
                    builder.set_demand(demand);
                }

                if let Some([lon, lat]) = station.coordinates {
                    builder.set_location(Location::from_lat_lon(lat, lon));
                }

                builder.build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let graph = match self.edges {
            Some(edges) => StationGraph::new(
                stations,
                edges
                    .into_iter()
                    .map(|edge| Edge::new(edge.from, edge.to, edge.weight))
                    .collect(),
            )?,
            None => StationGraph::from_locations(stations)?,
        };

        let mut depot = Depot::new(graph, snapshot)?;

        if let Some(id) = self.id {
            depot = depot.with_id(id);
        }

        if let Some(start) = self.start {
            depot = depot.with_canonical_start(&start)?;
        }

        Ok(depot)
    }
}
