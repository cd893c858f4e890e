use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::error::SamplerError;

/// Stop signal shared between an async sampler call and the blocking thread
/// doing the work. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationFlag {
    is_stopped: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn cancel(&self) {
        self.is_stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_stopped.load(Ordering::Relaxed)
    }

    pub fn check(&self) -> Result<(), SamplerError> {
        if self.is_cancelled() {
            Err(SamplerError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Cancels the flag when the returned guard is dropped. Held across the
    /// `spawn_blocking` await, it stops the blocking work once the caller
    /// gives up on the future, e.g. on a deadline.
    pub fn cancel_on_drop(&self) -> CancelOnDrop {
        CancelOnDrop(self.clone())
    }
}

pub struct CancelOnDrop(CancellationFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}
