use tracing::debug;

use crate::{
    cancellation::CancellationFlag,
    error::SamplerError,
    sample_request::SampleRequest,
    sample_set::{SampleRecord, SampleSet},
    sampler::Sampler,
};

pub const DEFAULT_MAX_VARIABLES: usize = 24;

const CANCEL_CHECK_INTERVAL: u64 = 4096;

/// Enumerates every assignment in Gray-code order and keeps the
/// `num_reads` lowest energies. Deterministic, only usable on tiny problems.
#[derive(Debug, Clone, Copy)]
pub struct ExhaustiveSampler {
    max_variables: usize,
}

impl Default for ExhaustiveSampler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VARIABLES)
    }
}

impl ExhaustiveSampler {
    pub fn new(max_variables: usize) -> Self {
        // Shifting a u64 past 63 bits would overflow.
        Self {
            max_variables: max_variables.min(63),
        }
    }

    pub fn max_variables(&self) -> usize {
        self.max_variables
    }

    pub fn sample_blocking(&self, request: &SampleRequest) -> Result<SampleSet, SamplerError> {
        self.sample_cancellable(request, &CancellationFlag::default())
    }

    /// Same as [`ExhaustiveSampler::sample_blocking`], giving up with
    /// [`SamplerError::Cancelled`] once `cancellation` is set.
    pub fn sample_cancellable(
        &self,
        request: &SampleRequest,
        cancellation: &CancellationFlag,
    ) -> Result<SampleSet, SamplerError> {
        request.validate()?;
        cancellation.check()?;

        let num_variables = request.num_variables;
        if num_variables > self.max_variables {
            return Err(SamplerError::TooManyVariables {
                num_variables,
                max: self.max_variables,
            });
        }

        let (linear, neighbours) = request.adjacency();
        let mut state = vec![0u8; num_variables];
        let mut energy = request.offset;
        let mut best = BestRecords::new(request.num_reads);

        best.offer(request, &state, energy);

        for step in 1u64..(1u64 << num_variables) {
            if step % CANCEL_CHECK_INTERVAL == 0 {
                cancellation.check()?;
            }

            let flip = step.trailing_zeros() as usize;
            let field = linear[flip]
                + neighbours[flip]
                    .iter()
                    .filter(|(other, _)| state[*other] != 0)
                    .map(|(_, bias)| bias)
                    .sum::<f64>();

            if state[flip] == 0 {
                energy += field;
                state[flip] = 1;
            } else {
                energy -= field;
                state[flip] = 0;
            }

            best.offer(request, &state, energy);
        }

        debug!(
            num_variables,
            "Exhaustive sampler enumerated {} assignments",
            1u64 << num_variables
        );

        Ok(SampleSet::from_records(best.records))
    }
}

impl Sampler for ExhaustiveSampler {
    async fn sample(&self, request: SampleRequest) -> Result<SampleSet, SamplerError> {
        let sampler = *self;
        let cancellation = CancellationFlag::default();
        let _guard = cancellation.cancel_on_drop();

        tokio::task::spawn_blocking(move || sampler.sample_cancellable(&request, &cancellation))
            .await?
    }
}

struct BestRecords {
    capacity: usize,
    records: Vec<SampleRecord>,
}

impl BestRecords {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: Vec::with_capacity(capacity + 1),
        }
    }

    fn offer(&mut self, request: &SampleRequest, state: &[u8], running_energy: f64) {
        if self.records.len() == self.capacity
            && self
                .records
                .last()
                .is_some_and(|worst| worst.energy <= running_energy)
        {
            return;
        }

        // The running energy drifts with every flip, store the exact one.
        let energy = request.energy(state);
        let position = self
            .records
            .partition_point(|record| record.energy <= energy);

        self.records.insert(
            position,
            SampleRecord {
                assignment: state.to_vec(),
                energy,
                num_occurrences: 1,
            },
        );
        self.records.truncate(self.capacity);
    }
}
