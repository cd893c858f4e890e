use std::collections::BTreeMap;

use crate::problem::station::StationId;

/// Bike counts observed at each station at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BikeCountSnapshot {
    counts: BTreeMap<StationId, u32>,
}

impl BikeCountSnapshot {
    pub fn insert(&mut self, station: impl Into<StationId>, count: u32) {
        self.counts.insert(station.into(), count);
    }

    pub fn get(&self, station: &StationId) -> Option<u32> {
        self.counts.get(station).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total_bikes(&self) -> u64 {
        self.counts.values().map(|&count| u64::from(count)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StationId, u32)> {
        self.counts.iter().map(|(station, &count)| (station, count))
    }
}

impl<S: Into<StationId>> FromIterator<(S, u32)> for BikeCountSnapshot {
    fn from_iter<T: IntoIterator<Item = (S, u32)>>(iter: T) -> Self {
        BikeCountSnapshot {
            counts: iter
                .into_iter()
                .map(|(station, count)| (station.into(), count))
                .collect(),
        }
    }
}
