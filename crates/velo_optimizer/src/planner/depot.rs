use crate::{
    problem::{
        station::{StationId, StationIdx},
        station_graph::{GraphError, StationGraph},
    },
    threshold::bike_count_snapshot::BikeCountSnapshot,
};

/// A group of stations served by one vehicle: their travel costs and the
/// latest bike counts.
#[derive(Debug, Clone)]
pub struct Depot {
    id: Option<String>,
    graph: StationGraph,
    snapshot: BikeCountSnapshot,
    canonical_start: Option<StationIdx>,
}

impl Depot {
    /// Every station of the snapshot must be part of the graph.
    pub fn new(graph: StationGraph, snapshot: BikeCountSnapshot) -> Result<Self, GraphError> {
        if let Some((unknown, _)) = snapshot
            .iter()
            .find(|(station, _)| graph.index_of(station).is_none())
        {
            return Err(GraphError::UnknownStation(unknown.clone()));
        }

        Ok(Depot {
            id: None,
            graph,
            snapshot,
            canonical_start: None,
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Routes of this depot will start at `station`.
    pub fn with_canonical_start(mut self, station: &StationId) -> Result<Self, GraphError> {
        let idx = self
            .graph
            .index_of(station)
            .ok_or_else(|| GraphError::UnknownStation(station.clone()))?;
        self.canonical_start = Some(idx);
        Ok(self)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn graph(&self) -> &StationGraph {
        &self.graph
    }

    pub fn snapshot(&self) -> &BikeCountSnapshot {
        &self.snapshot
    }

    pub fn canonical_start(&self) -> Option<StationIdx> {
        self.canonical_start
    }
}
