use std::collections::BTreeMap;

use serde::Serialize;

use crate::problem::station::StationId;

/// Bikes each station is missing (positive) or has in excess (negative)
/// compared to the fleet-wide target.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct StationNeeds {
    needs: BTreeMap<StationId, i64>,
}

impl StationNeeds {
    pub fn get(&self, station: &StationId) -> Option<i64> {
        self.needs.get(station).copied()
    }

    pub fn len(&self) -> usize {
        self.needs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.needs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StationId, i64)> {
        self.needs.iter().map(|(station, &need)| (station, need))
    }

    /// Bikes to collect from stations with a surplus.
    pub fn total_surplus(&self) -> u64 {
        self.needs
            .values()
            .filter(|need| **need < 0)
            .map(|need| need.unsigned_abs())
            .sum()
    }

    /// Bikes to deliver to stations short of the target.
    pub fn total_deficit(&self) -> u64 {
        self.needs
            .values()
            .filter(|need| **need > 0)
            .map(|need| need.unsigned_abs())
            .sum()
    }
}

impl FromIterator<(StationId, i64)> for StationNeeds {
    fn from_iter<T: IntoIterator<Item = (StationId, i64)>>(iter: T) -> Self {
        StationNeeds {
            needs: iter.into_iter().collect(),
        }
    }
}
