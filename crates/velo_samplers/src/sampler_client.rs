use tracing::debug;

use crate::{
    error::SamplerError,
    exhaustive::{DEFAULT_MAX_VARIABLES, ExhaustiveSampler},
    remote_api::{RemoteSampler, RemoteSamplerParams},
    sample_request::SampleRequest,
    sample_set::SampleSet,
    sampler::Sampler,
    sampler_provider::SamplerProvider,
    simulated_annealing::{SimulatedAnnealingParams, SimulatedAnnealingSampler},
};

enum SamplerBackend {
    Exhaustive(ExhaustiveSampler),
    SimulatedAnnealing(SimulatedAnnealingSampler),
    Remote(RemoteSampler),
}

/// Sampler selected from a [`SamplerProvider`] configuration.
pub struct SamplerClient {
    backend: SamplerBackend,
}

impl SamplerClient {
    pub fn new(provider: SamplerProvider) -> Result<Self, SamplerError> {
        let backend = match provider {
            SamplerProvider::Exhaustive { max_variables } => SamplerBackend::Exhaustive(
                ExhaustiveSampler::new(max_variables.unwrap_or(DEFAULT_MAX_VARIABLES)),
            ),
            SamplerProvider::SimulatedAnnealing { num_sweeps } => {
                let defaults = SimulatedAnnealingParams::default();
                SamplerBackend::SimulatedAnnealing(SimulatedAnnealingSampler::new(
                    SimulatedAnnealingParams {
                        num_sweeps: num_sweeps.unwrap_or(defaults.num_sweeps),
                        ..defaults
                    },
                ))
            }
            SamplerProvider::Remote { endpoint } => SamplerBackend::Remote(RemoteSampler::new(
                RemoteSamplerParams::from_env(endpoint)?,
            )),
        };

        Ok(Self { backend })
    }

    fn name(&self) -> &'static str {
        match self.backend {
            SamplerBackend::Exhaustive(_) => "exhaustive",
            SamplerBackend::SimulatedAnnealing(_) => "simulated_annealing",
            SamplerBackend::Remote(_) => "remote",
        }
    }
}

impl Sampler for SamplerClient {
    async fn sample(&self, request: SampleRequest) -> Result<SampleSet, SamplerError> {
        debug!(
            sampler = self.name(),
            num_variables = request.num_variables,
            num_quadratic = request.quadratic.len(),
            "Dispatching sample request"
        );

        match &self.backend {
            SamplerBackend::Exhaustive(sampler) => sampler.sample(request).await,
            SamplerBackend::SimulatedAnnealing(sampler) => sampler.sample(request).await,
            SamplerBackend::Remote(sampler) => sampler.sample(request).await,
        }
    }
}
