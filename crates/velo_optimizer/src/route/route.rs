use crate::problem::{
    station::{StationId, StationIdx},
    station_graph::{GraphError, StationGraph},
    travel_cost_matrix::Cost,
};

/// Ordered visit of every station in a depot, each exactly once.
///
/// The route is closed: the vehicle returns from the last station to the
/// first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    stations: Vec<StationIdx>,
}

impl Route {
    pub fn new(stations: Vec<StationIdx>) -> Self {
        Route { stations }
    }

    pub fn stations(&self) -> &[StationIdx] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn first(&self) -> Option<StationIdx> {
        self.stations.first().copied()
    }

    pub fn position_of(&self, station: StationIdx) -> Option<usize> {
        self.stations.iter().position(|&s| s == station)
    }

    /// Rotates the cycle so `start` comes first. The visiting order is kept.
    /// Does nothing if `start` is not part of the route.
    pub fn rotate_to_start(&mut self, start: StationIdx) {
        if let Some(position) = self.position_of(start) {
            self.stations.rotate_left(position);
        }
    }

    pub fn station_ids<'a>(&'a self, graph: &'a StationGraph) -> impl Iterator<Item = &'a StationId> {
        self.stations
            .iter()
            .map(|&station| graph.station(station).id())
    }

    /// Cost of the closed tour, return leg included.
    pub fn travel_cost(&self, graph: &StationGraph) -> Result<Cost, GraphError> {
        let open = self.path_cost(graph)?;

        match (self.stations.first(), self.stations.last()) {
            (Some(&first), Some(&last)) if self.stations.len() > 1 => {
                Ok(open + graph.cost(last, first)?)
            }
            _ => Ok(open),
        }
    }

    /// Cost of driving the route without returning to the start.
    pub fn path_cost(&self, graph: &StationGraph) -> Result<Cost, GraphError> {
        self.stations
            .windows(2)
            .map(|pair| graph.cost(pair[0], pair[1]))
            .sum()
    }
}
