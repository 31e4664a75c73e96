//! Bounded retry with linear backoff for remote calls
//!
//! Retries wrap only the completion calls. UI actions are never retried:
//! repeating a click that may have half-succeeded can double-submit a
//! form, and the platform offers no way to tell.

use quill_core::{GenerationConfig, QuillError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Retry configuration for remote calls
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Linear backoff base; attempt N sleeps N * base before retrying
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.backoff_ms),
        }
    }

    /// Delay after a failed attempt (1-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

/// Run `op` up to `policy.max_attempts` times.
///
/// Only transient failures (network, timeout, retryable status, malformed
/// response) are retried; everything else propagates immediately. After
/// the budget is spent the last cause is wrapped in
/// [`QuillError::RetryExhausted`] and the caller decides whether that is
/// absorbable.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, what: &str, op: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error: Option<QuillError> = None;

    for attempt in 1..=policy.max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if !e.is_retryable() {
                    return Err(e);
                }
                warn!(
                    "{} failed (attempt {}/{}, class: {}): {}",
                    what,
                    attempt,
                    policy.max_attempts,
                    e.class(),
                    e
                );
                last_error = Some(e);
                if attempt < policy.max_attempts {
                    sleep(policy.delay_for_attempt(attempt)).await;
                }
            }
        }
    }

    Err(QuillError::RetryExhausted {
        attempts: policy.max_attempts,
        source: Box::new(
            last_error.unwrap_or_else(|| QuillError::Other("no attempts were made".to_string())),
        ),
    })
}
