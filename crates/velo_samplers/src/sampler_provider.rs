use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, JsonSchema, Clone, Debug)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum SamplerProvider {
    /// Enumerates every assignment, only for a handful of stations.
    Exhaustive { max_variables: Option<usize> },

    SimulatedAnnealing { num_sweeps: Option<usize> },

    /// Remote solver service. The token is always read from the environment.
    Remote { endpoint: Option<String> },
}

impl Default for SamplerProvider {
    fn default() -> Self {
        SamplerProvider::SimulatedAnnealing { num_sweeps: None }
    }
}
