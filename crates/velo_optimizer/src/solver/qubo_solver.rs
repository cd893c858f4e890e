use jiff::SignedDuration;
use thiserror::Error;
use tracing::{info, instrument, warn};
use velo_samplers::{error::SamplerError, sampler::Sampler};

use crate::{
    qubo::{qubo::Qubo, sample::Sample},
    solver::solver_params::SolverParams,
};

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Solver unavailable: {0}")]
    SolverUnavailable(#[source] SamplerError),

    #[error("Solver did not answer within {0}")]
    Timeout(SignedDuration),

    #[error("Solver returned no samples")]
    NoSolution,

    #[error("Solver returned {actual} values for {expected} variables")]
    MalformedSample { expected: usize, actual: usize },
}

/// Best sample found for a QUBO and its energy, offset included.
#[derive(Debug, Clone)]
pub struct Solution {
    pub sample: Sample,
    pub energy: f64,
    pub num_occurrences: usize,
}

/// Hands QUBOs to a sampler and turns its answer back into a [`Sample`].
///
/// Retrying is left to the caller.
pub struct QuboSolver<S> {
    sampler: S,
    params: SolverParams,
}

impl<S: Sampler> QuboSolver<S> {
    pub fn new(sampler: S, params: SolverParams) -> Self {
        QuboSolver { sampler, params }
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    #[instrument(skip_all, fields(coefficients = qubo.len()))]
    pub async fn solve(&self, qubo: &Qubo, offset: f64) -> Result<Solution, SolverError> {
        // A negative deadline has already passed.
        if let Some(timeout) = self.params.timeout.filter(|timeout| timeout.is_negative()) {
            warn!(%timeout, "Sampler deadline exceeded");
            return Err(SolverError::Timeout(timeout));
        }

        let (request, variables) = qubo.to_sample_request(
            offset,
            self.params.num_reads,
            self.params.label.clone(),
            self.params.seed,
        );

        let sampling = self.sampler.sample(request);
        let result = match self.params.timeout {
            Some(timeout) => tokio::time::timeout(timeout.unsigned_abs(), sampling)
                .await
                .map_err(|_| {
                    warn!(%timeout, "Sampler deadline exceeded");
                    SolverError::Timeout(timeout)
                })?,
            None => sampling.await,
        };

        let sample_set = result.map_err(SolverError::SolverUnavailable)?;
        let best = sample_set.first().ok_or(SolverError::NoSolution)?;

        if best.assignment.len() != variables.len() {
            return Err(SolverError::MalformedSample {
                expected: variables.len(),
                actual: best.assignment.len(),
            });
        }

        info!(
            energy = best.energy,
            records = sample_set.len(),
            "Sampler returned"
        );

        Ok(Solution {
            sample: variables
                .iter()
                .zip(&best.assignment)
                .map(|(&variable, &value)| (variable, value != 0))
                .collect(),
            energy: best.energy,
            num_occurrences: best.num_occurrences,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use velo_samplers::{
        exhaustive::ExhaustiveSampler,
        sample_request::SampleRequest,
        sample_set::{SampleRecord, SampleSet},
    };

    use crate::{
        problem::station::StationIdx,
        qubo::{qubo_builder, qubo_variable::QuboVariable},
        test_utils,
    };

    use super::*;

    struct StaticSampler(Vec<SampleRecord>);

    impl Sampler for StaticSampler {
        async fn sample(&self, _request: SampleRequest) -> Result<SampleSet, SamplerError> {
            Ok(SampleSet::from_records(self.0.clone()))
        }
    }

    struct SlowSampler;

    impl Sampler for SlowSampler {
        async fn sample(&self, _request: SampleRequest) -> Result<SampleSet, SamplerError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(SampleSet::default())
        }
    }

    struct UnreachableSampler;

    impl Sampler for UnreachableSampler {
        async fn sample(&self, _request: SampleRequest) -> Result<SampleSet, SamplerError> {
            Err(SamplerError::Api {
                status: 503,
                message: String::from("queue closed"),
            })
        }
    }

    fn small_qubo() -> Qubo {
        let mut qubo = Qubo::default();
        qubo.add_linear(QuboVariable::from_indices(0, 0), -1.0);
        qubo.add(
            QuboVariable::from_indices(0, 0),
            QuboVariable::from_indices(1, 0),
            2.0,
        );
        qubo
    }

    #[tokio::test]
    async fn test_solve_maps_sample_back() {
        let graph = test_utils::create_reference_graph();
        let (qubo, offset) = qubo_builder::build(&graph, 4000.0).unwrap();

        let solver = QuboSolver::new(
            ExhaustiveSampler::default(),
            SolverParams {
                num_reads: 1,
                ..SolverParams::default()
            },
        );
        let solution = solver.solve(&qubo, offset).await.unwrap();

        let expected = Sample::from_tour(&[2, 1, 0, 3].map(StationIdx::new));
        assert_eq!(
            solution.sample.active().collect::<Vec<_>>(),
            expected.active().collect::<Vec<_>>()
        );
        assert_eq!(solution.energy, 1020.0);
    }

    #[tokio::test]
    async fn test_no_samples() {
        let solver = QuboSolver::new(StaticSampler(vec![]), SolverParams::default());

        assert!(matches!(
            solver.solve(&small_qubo(), 0.0).await,
            Err(SolverError::NoSolution)
        ));
    }

    #[tokio::test]
    async fn test_malformed_sample() {
        let solver = QuboSolver::new(
            StaticSampler(vec![SampleRecord {
                assignment: vec![1],
                energy: 0.0,
                num_occurrences: 1,
            }]),
            SolverParams::default(),
        );

        assert!(matches!(
            solver.solve(&small_qubo(), 0.0).await,
            Err(SolverError::MalformedSample {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[tokio::test]
    async fn test_unavailable_sampler() {
        let solver = QuboSolver::new(UnreachableSampler, SolverParams::default());

        assert!(matches!(
            solver.solve(&small_qubo(), 0.0).await,
            Err(SolverError::SolverUnavailable(SamplerError::Api {
                status: 503,
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn test_negative_deadline_is_already_expired() {
        let solver = QuboSolver::new(
            ExhaustiveSampler::default(),
            SolverParams {
                timeout: Some(SignedDuration::from_secs(-5)),
                ..SolverParams::default()
            },
        );

        assert!(matches!(
            solver.solve(&small_qubo(), 0.0).await,
            Err(SolverError::Timeout(timeout)) if timeout == SignedDuration::from_secs(-5)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline() {
        let solver = QuboSolver::new(
            SlowSampler,
            SolverParams {
                timeout: Some(SignedDuration::from_secs(5)),
                ..SolverParams::default()
            },
        );

        assert!(matches!(
            solver.solve(&small_qubo(), 0.0).await,
            Err(SolverError::Timeout(_))
        ));
    }
}
