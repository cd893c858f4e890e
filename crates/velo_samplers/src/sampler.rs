use std::future::Future;

use crate::{error::SamplerError, sample_request::SampleRequest, sample_set::SampleSet};

/// A capability that minimizes a binary quadratic objective.
///
/// Implementations may be heuristic and non-deterministic. They must return
/// their best-found records, or an error, and never block the async runtime.
/// Dropping the returned future abandons the call: local samplers stop their
/// blocking work through a [`CancellationFlag`], remote ones stop polling.
///
/// [`CancellationFlag`]: crate::cancellation::CancellationFlag
pub trait Sampler: Send + Sync {
    fn sample(
        &self,
        request: SampleRequest,
    ) -> impl Future<Output = Result<SampleSet, SamplerError>> + Send;
}
