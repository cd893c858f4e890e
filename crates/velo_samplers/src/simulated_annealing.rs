use fxhash::FxHashMap;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::debug;

use crate::{
    cancellation::CancellationFlag,
    error::SamplerError,
    sample_request::SampleRequest,
    sample_set::{SampleRecord, SampleSet},
    sampler::Sampler,
};

#[derive(Clone, Debug)]
pub struct SimulatedAnnealingParams {
    pub num_sweeps: usize,
    /// Inverse temperatures at the first and last sweep. Derived from the
    /// coefficient magnitudes when not set.
    pub beta_range: Option<(f64, f64)>,
}

impl Default for SimulatedAnnealingParams {
    fn default() -> Self {
        Self {
            num_sweeps: 1000,
            beta_range: None,
        }
    }
}

/// Single-flip Metropolis annealing with a geometric schedule. Every read is
/// an independent restart from a random state.
#[derive(Clone, Debug, Default)]
pub struct SimulatedAnnealingSampler {
    params: SimulatedAnnealingParams,
}

impl SimulatedAnnealingSampler {
    pub fn new(params: SimulatedAnnealingParams) -> Self {
        Self { params }
    }

    pub fn sample_blocking(&self, request: &SampleRequest) -> Result<SampleSet, SamplerError> {
        self.sample_cancellable(request, &CancellationFlag::default())
    }

    /// Gives up with [`SamplerError::Cancelled`] at the next sweep once
    /// `cancellation` is set.
    pub fn sample_cancellable(
        &self,
        request: &SampleRequest,
        cancellation: &CancellationFlag,
    ) -> Result<SampleSet, SamplerError> {
        request.validate()?;

        let (linear, neighbours) = request.adjacency();
        let (hot_beta, cold_beta) = self
            .params
            .beta_range
            .unwrap_or_else(|| default_beta_range(&linear, &neighbours));
        let schedule = geometric_schedule(hot_beta, cold_beta, self.params.num_sweeps);

        let mut rng = match request.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let mut occurrences: FxHashMap<Vec<u8>, usize> = FxHashMap::default();
        for _ in 0..request.num_reads {
            let mut read_rng = SmallRng::from_rng(&mut rng);
            let state = anneal(&linear, &neighbours, &schedule, &mut read_rng, cancellation)?;
            *occurrences.entry(state).or_default() += 1;
        }

        let records = occurrences
            .into_iter()
            .map(|(assignment, num_occurrences)| SampleRecord {
                energy: request.energy(&assignment),
                assignment,
                num_occurrences,
            })
            .collect::<Vec<_>>();

        debug!(
            num_reads = request.num_reads,
            distinct = records.len(),
            hot_beta,
            cold_beta,
            "Simulated annealing finished"
        );

        Ok(SampleSet::from_records(records))
    }
}

impl Sampler for SimulatedAnnealingSampler {
    async fn sample(&self, request: SampleRequest) -> Result<SampleSet, SamplerError> {
        let sampler = self.clone();
        let cancellation = CancellationFlag::default();
        let _guard = cancellation.cancel_on_drop();

        tokio::task::spawn_blocking(move || sampler.sample_cancellable(&request, &cancellation))
            .await?
    }
}

fn anneal(
    linear: &[f64],
    neighbours: &[Vec<(usize, f64)>],
    schedule: &[f64],
    rng: &mut SmallRng,
    cancellation: &CancellationFlag,
) -> Result<Vec<u8>, SamplerError> {
    let num_variables = linear.len();
    let mut state: Vec<u8> = (0..num_variables)
        .map(|_| u8::from(rng.random_bool(0.5)))
        .collect();

    // field[i] is the energy change of setting variable i from 0 to 1.
    let mut field = linear.to_vec();
    for (variable, adjacent) in neighbours.iter().enumerate() {
        for &(other, bias) in adjacent {
            if state[other] != 0 {
                field[variable] += bias;
            }
        }
    }

    for &beta in schedule {
        cancellation.check()?;

        for variable in 0..num_variables {
            let delta = if state[variable] == 0 {
                field[variable]
            } else {
                -field[variable]
            };

            if delta > 0.0 && rng.random::<f64>() >= (-beta * delta).exp() {
                continue;
            }

            let change = if state[variable] == 0 { 1.0 } else { -1.0 };
            state[variable] ^= 1;
            for &(other, bias) in &neighbours[variable] {
                field[other] += change * bias;
            }
        }
    }

    Ok(state)
}

fn default_beta_range(linear: &[f64], neighbours: &[Vec<(usize, f64)>]) -> (f64, f64) {
    let max_delta = linear
        .iter()
        .zip(neighbours)
        .map(|(bias, adjacent)| {
            bias.abs() + adjacent.iter().map(|(_, bias)| bias.abs()).sum::<f64>()
        })
        .fold(0.0, f64::max);

    let min_delta = linear
        .iter()
        .copied()
        .chain(neighbours.iter().flatten().map(|(_, bias)| *bias))
        .map(f64::abs)
        .filter(|bias| *bias > 0.0)
        .fold(f64::INFINITY, f64::min);

    if max_delta == 0.0 || !min_delta.is_finite() {
        return (0.1, 1.0);
    }

    let hot = 2f64.ln() / max_delta;
    let cold = 100f64.ln() / min_delta;
    (hot, cold.max(hot))
}

fn geometric_schedule(hot_beta: f64, cold_beta: f64, num_sweeps: usize) -> Vec<f64> {
    match num_sweeps {
        0 => Vec::new(),
        1 => vec![cold_beta],
        _ => {
            let ratio = (cold_beta / hot_beta).powf(1.0 / (num_sweeps - 1) as f64);
            (0..num_sweeps)
                .map(|sweep| hot_beta * ratio.powi(sweep as i32))
                .collect()
        }
    }
}
