use jiff::SignedDuration;

#[derive(Clone, Debug)]
pub struct SolverParams {
    /// Deadline for a single sampler call. `None` waits forever.
    pub timeout: Option<SignedDuration>,
    pub num_reads: usize,
    pub seed: Option<u64>,
    pub label: Option<String>,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            timeout: Some(SignedDuration::from_mins(2)),
            num_reads: 100,
            seed: None,
            label: Some(String::from("bike-rebalancing")),
        }
    }
}
