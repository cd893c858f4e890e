use std::collections::BTreeMap;

use crate::{
    problem::station::StationIdx,
    qubo::qubo_variable::{QuboVariable, SlotIdx},
};

/// Binary assignment returned by a sampler. Variables that are absent are 0.
///
/// Nothing guarantees the assignment is a valid tour; the route decoder
/// checks the one-hot structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sample {
    values: BTreeMap<QuboVariable, bool>,
}

impl Sample {
    /// Sample that visits `stations[t]` at slot `t`.
    pub fn from_tour(stations: &[StationIdx]) -> Self {
        stations
            .iter()
            .enumerate()
            .map(|(slot, &station)| (QuboVariable::new(station, SlotIdx::new(slot)), true))
            .collect()
    }

    pub fn set(&mut self, variable: QuboVariable, value: bool) {
        self.values.insert(variable, value);
    }

    pub fn get(&self, variable: &QuboVariable) -> bool {
        self.values.get(variable).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Variables set to 1, in variable order.
    pub fn active(&self) -> impl Iterator<Item = QuboVariable> + '_ {
        self.values
            .iter()
            .filter(|(_, value)| **value)
            .map(|(variable, _)| *variable)
    }
}

impl FromIterator<(QuboVariable, bool)> for Sample {
    fn from_iter<T: IntoIterator<Item = (QuboVariable, bool)>>(iter: T) -> Self {
        Sample {
            values: iter.into_iter().collect(),
        }
    }
}
