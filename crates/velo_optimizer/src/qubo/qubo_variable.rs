use std::fmt::Display;

use serde::Serialize;

use crate::{define_index_newtype, problem::station::StationIdx};

define_index_newtype!(SlotIdx, Option<StationIdx>);

/// Binary decision "station is visited at tour position slot".
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuboVariable {
    pub station: StationIdx,
    pub slot: SlotIdx,
}

impl QuboVariable {
    pub fn new(station: StationIdx, slot: SlotIdx) -> Self {
        QuboVariable { station, slot }
    }

    pub fn from_indices(station: usize, slot: usize) -> Self {
        QuboVariable {
            station: StationIdx::new(station),
            slot: SlotIdx::new(slot),
        }
    }
}

impl Display for QuboVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.station, self.slot)
    }
}

/// Unordered pair of variables, stored smallest first so each pair has a
/// single key. A pair of the same variable is a linear term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariablePair(QuboVariable, QuboVariable);

impl VariablePair {
    pub fn new(a: QuboVariable, b: QuboVariable) -> Self {
        if a <= b {
            VariablePair(a, b)
        } else {
            VariablePair(b, a)
        }
    }

    pub fn linear(variable: QuboVariable) -> Self {
        VariablePair(variable, variable)
    }

    pub fn first(&self) -> QuboVariable {
        self.0
    }

    pub fn second(&self) -> QuboVariable {
        self.1
    }

    pub fn is_linear(&self) -> bool {
        self.0 == self.1
    }
}
