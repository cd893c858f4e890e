use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SampleRecord {
    pub assignment: Vec<u8>,
    pub energy: f64,
    #[serde(default = "default_occurrences")]
    pub num_occurrences: usize,
}

fn default_occurrences() -> usize {
    1
}

/// Samples returned by a sampler, ordered from lowest to highest energy.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SampleSet {
    records: Vec<SampleRecord>,
}

impl SampleSet {
    pub fn from_records(mut records: Vec<SampleRecord>) -> Self {
        records.sort_by(|a, b| a.energy.total_cmp(&b.energy));
        SampleSet { records }
    }

    pub fn first(&self) -> Option<&SampleRecord> {
        self.records.first()
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
