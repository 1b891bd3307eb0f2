//! Bounded retry with linear backoff.
//!
//! Only errors that report themselves as [`Transient`] are retried.
//! Anything else is returned after the first attempt, untouched.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

/// Classifies an error as worth retrying.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

/// How many attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_retries: u32,
    /// Attempt `n` that fails waits `retry_delay * n` before attempt `n + 1`.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            retry_delay,
        }
    }

    /// Delay after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.retry_delay * attempt
    }
}

/// Run `op` until it succeeds, fails with a non-transient error, or
/// exhausts `policy.max_retries` attempts.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    E: Transient + Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => {
                error!("Request failed with non-network error: {}", err);
                return Err(err);
            }
            Err(err) if attempt >= policy.max_retries => {
                error!(
                    "Request failed, giving up after {} attempts: {}",
                    attempt, err
                );
                return Err(err);
            }
            Err(err) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "Request failed (attempt {}), retrying in {:?}: {}",
                    attempt, delay, err
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
