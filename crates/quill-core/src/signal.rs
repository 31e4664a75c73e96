//! Rate-limit cancellation signal
//!
//! The platform announces action quotas with a blocking alert dialog. The
//! dialog layer dismisses it and trips this signal; walkers check it
//! between atomic UI actions and stop issuing further work. The signal is
//! set-once and never cleared within a run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation token shared between the dialog layer and the
/// queue walkers.
///
/// Clones share the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct RateLimitSignal {
    tripped: Arc<AtomicBool>,
}

impl RateLimitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the platform quota as reached. Idempotent.
    pub fn trip(&self) {
        if !self.tripped.swap(true, Ordering::SeqCst) {
            tracing::warn!("platform rate limit signaled; run will stop at next checkpoint");
        }
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }
}
