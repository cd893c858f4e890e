use fxhash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    problem::{
        station::{Station, StationId, StationIdx, StationTag},
        travel_cost_matrix::{Cost, TravelCosts},
    },
    threshold::station_needs::StationNeeds,
};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Station is missing an id")]
    MissingStationId,

    #[error("Station {0} is tagged as both supply and demand")]
    InvalidStationTag(StationId),

    #[error("Station {0} is defined more than once")]
    DuplicateStation(StationId),

    #[error("Unknown station {0}")]
    UnknownStation(StationId),

    #[error("Invalid edge {from} - {to} with weight {weight}")]
    InvalidEdge {
        from: StationId,
        to: StationId,
        weight: f64,
    },

    #[error("Station {0} has no coordinates")]
    MissingLocation(StationId),

    #[error("No travel cost defined between {from} and {to}")]
    MissingEdge { from: StationId, to: StationId },
}

/// Undirected weighted edge between two stations.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: StationId,
    pub to: StationId,
    pub weight: Cost,
}

impl Edge {
    pub fn new(from: impl Into<StationId>, to: impl Into<StationId>, weight: Cost) -> Self {
        Edge {
            from: from.into(),
            to: to.into(),
            weight,
        }
    }
}

/// Stations in a fixed order plus the travel costs between them.
///
/// The order in which stations are given is kept as is: `StationIdx(i)` is
/// the i-th station passed in, and tour slots are numbered against it.
#[derive(Debug, Clone)]
pub struct StationGraph {
    stations: Vec<Station>,
    index: FxHashMap<StationId, StationIdx>,
    costs: TravelCosts,
}

fn index_stations(stations: &[Station]) -> Result<FxHashMap<StationId, StationIdx>, GraphError> {
    let mut index = FxHashMap::default();
    for (position, station) in stations.iter().enumerate() {
        if index
            .insert(station.id().clone(), StationIdx::new(position))
            .is_some()
        {
            return Err(GraphError::DuplicateStation(station.id().clone()));
        }
    }

    Ok(index)
}

impl StationGraph {
    pub fn new(stations: Vec<Station>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let index = index_stations(&stations)?;

        let mut indexed_edges = Vec::with_capacity(edges.len());
        for edge in edges {
            let from = *index
                .get(&edge.from)
                .ok_or_else(|| GraphError::UnknownStation(edge.from.clone()))?;
            let to = *index
                .get(&edge.to)
                .ok_or_else(|| GraphError::UnknownStation(edge.to.clone()))?;

            if from == to || !edge.weight.is_finite() || edge.weight < 0.0 {
                return Err(GraphError::InvalidEdge {
                    from: edge.from,
                    to: edge.to,
                    weight: edge.weight,
                });
            }

            indexed_edges.push((from, to, edge.weight));
        }

        let costs = TravelCosts::from_edges(stations.len(), &indexed_edges);

        debug!(
            stations = stations.len(),
            edges = indexed_edges.len(),
            "Built station graph"
        );

        Ok(StationGraph {
            stations,
            index,
            costs,
        })
    }

    /// Complete graph weighted by the great-circle distance between stations.
    pub fn from_locations(stations: Vec<Station>) -> Result<Self, GraphError> {
        let index = index_stations(&stations)?;

        let locations = stations
            .iter()
            .map(|station| {
                station
                    .location()
                    .copied()
                    .ok_or_else(|| GraphError::MissingLocation(station.id().clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StationGraph {
            stations,
            index,
            costs: TravelCosts::from_haversine(&locations),
        })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station(&self, idx: StationIdx) -> &Station {
        &self.stations[idx]
    }

    /// Station identifiers in slot order.
    pub fn station_ids(&self) -> impl Iterator<Item = &StationId> {
        self.stations.iter().map(Station::id)
    }

    pub fn index_of(&self, id: &StationId) -> Option<StationIdx> {
        self.index.get(id).copied()
    }

    pub fn cost(&self, from: StationIdx, to: StationIdx) -> Result<Cost, GraphError> {
        self.costs
            .travel_cost(from, to)
            .ok_or_else(|| GraphError::MissingEdge {
                from: self.station(from).id().clone(),
                to: self.station(to).id().clone(),
            })
    }

    pub fn cost_between(&self, from: &StationId, to: &StationId) -> Result<Cost, GraphError> {
        let from_idx = self
            .index_of(from)
            .ok_or_else(|| GraphError::UnknownStation(from.clone()))?;
        let to_idx = self
            .index_of(to)
            .ok_or_else(|| GraphError::UnknownStation(to.clone()))?;

        self.cost(from_idx, to_idx)
    }

    pub fn supply_stations(&self) -> Vec<StationIdx> {
        self.tagged(Station::is_supply)
    }

    pub fn demand_stations(&self) -> Vec<StationIdx> {
        self.tagged(Station::is_demand)
    }

    fn tagged(&self, predicate: impl Fn(&Station) -> bool) -> Vec<StationIdx> {
        StationIdx::range(self.len())
            .filter(|&idx| predicate(self.station(idx)))
            .collect()
    }

    pub fn travel_costs(&self) -> &TravelCosts {
        &self.costs
    }

    /// A lagrange multiplier large enough that one slot of rebalancing
    /// penalty (`lagrange / n`) outweighs the cost of any whole tour.
    pub fn suggested_lagrange(&self) -> f64 {
        let n = self.len() as f64;
        let lagrange = self.costs.max_cost() * n * n;

        if lagrange > 0.0 { lagrange } else { 1.0 }
    }

    /// Copy of the graph tagged from rebalancing needs: stations with a
    /// surplus become supply stations, stations short of bikes become demand
    /// stations and balanced ones are untagged. Stations without an entry
    /// keep their tag.
    pub fn with_needs(&self, needs: &StationNeeds) -> StationGraph {
        self.retag(needs, |_| true)
    }

    /// Like [`StationGraph::with_needs`], but stations that already carry a
    /// supply or demand tag keep it.
    pub fn with_needs_for_untagged(&self, needs: &StationNeeds) -> StationGraph {
        self.retag(needs, |station| station.tag() == StationTag::Neutral)
    }

    fn retag(&self, needs: &StationNeeds, overwrite: impl Fn(&Station) -> bool) -> StationGraph {
        let stations = self
            .stations
            .iter()
            .map(|station| match needs.get(station.id()) {
                Some(need) if overwrite(station) => {
                    let amount = u32::try_from(need.unsigned_abs()).unwrap_or(u32::MAX);
                    station.with_tag(match need.signum() {
                        -1 => StationTag::Supply(amount),
                        1 => StationTag::Demand(amount),
                        _ => StationTag::Neutral,
                    })
                }
                _ => station.clone(),
            })
            .collect();

        StationGraph {
            stations,
            index: self.index.clone(),
            costs: self.costs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{location::Location, station::StationBuilder},
        test_utils,
        threshold::station_needs::StationNeeds,
    };

    use super::*;

    #[test]
    fn test_station_order_is_insertion_order() {
        let graph = test_utils::create_reference_graph();

        assert_eq!(
            graph.station_ids().cloned().collect::<Vec<_>>(),
            (0..4).map(StationId::Number).collect::<Vec<_>>()
        );
        assert_eq!(
            graph.index_of(&StationId::Number(2)),
            Some(StationIdx::new(2))
        );
    }

    #[test]
    fn test_tags() {
        let graph = test_utils::create_reference_graph();

        assert_eq!(
            graph.supply_stations(),
            vec![StationIdx::new(1), StationIdx::new(2)]
        );
        assert_eq!(graph.demand_stations(), vec![StationIdx::new(3)]);
    }

    #[test]
    fn test_cost_is_symmetric_and_resolves_paths() {
        let graph = test_utils::create_reference_graph();

        for from in StationIdx::range(graph.len()) {
            for to in StationIdx::range(graph.len()) {
                assert_eq!(graph.cost(from, to).unwrap(), graph.cost(to, from).unwrap());
            }
        }
        assert_eq!(
            graph
                .cost_between(&StationId::Number(0), &StationId::Number(3))
                .unwrap(),
            8.0
        );
    }

    #[test]
    fn test_missing_edge() {
        let graph = StationGraph::new(
            test_utils::create_stations(&[0, 1, 2]),
            vec![Edge::new(StationId::Number(0), StationId::Number(1), 3.0)],
        )
        .unwrap();

        assert!(matches!(
            graph.cost(StationIdx::new(0), StationIdx::new(2)),
            Err(GraphError::MissingEdge {
                from: StationId::Number(0),
                to: StationId::Number(2)
            })
        ));
    }

    #[test]
    fn test_rejects_duplicate_stations() {
        let result = StationGraph::new(test_utils::create_stations(&[4, 5, 4]), vec![]);

        assert!(matches!(
            result,
            Err(GraphError::DuplicateStation(StationId::Number(4)))
        ));
    }

    #[test]
    fn test_rejects_invalid_edges() {
        let stations = test_utils::create_stations(&[0, 1]);

        let edge = |from, to, weight| {
            vec![Edge::new(StationId::Number(from), StationId::Number(to), weight)]
        };

        assert!(matches!(
            StationGraph::new(stations.clone(), edge(0, 1, -1.0)),
            Err(GraphError::InvalidEdge { .. })
        ));
        assert!(matches!(
            StationGraph::new(stations.clone(), edge(1, 1, 1.0)),
            Err(GraphError::InvalidEdge { .. })
        ));
        assert!(matches!(
            StationGraph::new(stations, edge(0, 9, 1.0)),
            Err(GraphError::UnknownStation(StationId::Number(9)))
        ));
    }

    #[test]
    fn test_from_locations_requires_coordinates() {
        let mut builder = StationBuilder::default();
        builder.set_id("no_coordinates");

        assert!(matches!(
            StationGraph::from_locations(vec![builder.build().unwrap()]),
            Err(GraphError::MissingLocation(_))
        ));
    }

    #[test]
    fn test_with_needs_retags_stations() {
        let graph = test_utils::create_reference_graph();
        let needs = StationNeeds::from_iter([
            (StationId::Number(0), -4),
            (StationId::Number(1), 0),
            (StationId::Number(2), 6),
        ]);

        let tagged = graph.with_needs(&needs);

        assert_eq!(tagged.station(StationIdx::new(0)).supply(), Some(4));
        assert_eq!(tagged.station(StationIdx::new(1)).tag(), StationTag::Neutral);
        assert_eq!(tagged.station(StationIdx::new(2)).demand(), Some(6));
        // No entry for station 3, its demand tag stays.
        assert_eq!(tagged.station(StationIdx::new(3)).demand(), Some(15));
    }

    #[test]
    fn test_with_needs_for_untagged_keeps_explicit_tags() {
        let graph = test_utils::create_reference_graph();
        let needs = StationNeeds::from_iter([
            (StationId::Number(0), -4),
            (StationId::Number(1), 7),
            (StationId::Number(3), -15),
        ]);

        let tagged = graph.with_needs_for_untagged(&needs);

        assert_eq!(tagged.station(StationIdx::new(0)).supply(), Some(4));
        assert_eq!(tagged.station(StationIdx::new(1)).supply(), Some(10));
        assert_eq!(tagged.station(StationIdx::new(2)).supply(), Some(5));
        assert_eq!(tagged.station(StationIdx::new(3)).demand(), Some(15));
    }

    #[test]
    fn test_from_locations_is_complete() {
        let stations = [(1, 45.5, -73.6), (2, 45.51, -73.57), (3, 45.52, -73.58)]
            .into_iter()
            .map(|(id, lat, lon)| {
                let mut builder = StationBuilder::default();
                builder
                    .set_id(StationId::Number(id))
                    .set_location(Location::from_lat_lon(lat, lon));
                builder.build().unwrap()
            })
            .collect();

        let graph = StationGraph::from_locations(stations).unwrap();

        for from in StationIdx::range(graph.len()) {
            for to in StationIdx::range(graph.len()) {
                let cost = graph.cost(from, to).unwrap();
                assert_eq!(cost == 0.0, from == to);
            }
        }
        assert_eq!(
            graph.suggested_lagrange(),
            graph.travel_costs().max_cost() * 9.0
        );
    }

    #[test]
    fn test_suggested_lagrange_dominates_tour_cost() {
        let graph = test_utils::create_reference_graph();

        assert_eq!(graph.suggested_lagrange(), 12.0 * 16.0);
    }
}
