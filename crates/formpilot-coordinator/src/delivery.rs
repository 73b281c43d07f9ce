//! Delivery retry policy.
//!
//! A just-injected scanner registers its listener at an unspecified point
//! after injection returns, so the first sends may find nobody listening.
//! The policy here is the pipeline's only concurrency-correctness
//! mechanism: a bounded number of attempts with a configurable delay
//! shape, parameterized over what counts as retryable.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

/// Delay shape between attempts.
#[derive(Debug, Clone, Copy)]
pub enum Backoff {
    /// Same delay between every attempt.
    Fixed,
    /// Delay multiplied after each attempt, capped at `max_delay`.
    Exponential {
        multiplier: f64,
        max_delay: Duration,
    },
}

/// Bounded retry policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Fixed-delay policy.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            backoff: Backoff::Fixed,
        }
    }

    /// Delay before the next attempt after `attempt` (zero-based) failed.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential {
                multiplier,
                max_delay,
            } => {
                let ms = self.delay.as_millis() as f64 * multiplier.powi(attempt as i32);
                Duration::from_millis(ms.min(max_delay.as_millis() as f64) as u64)
            }
        }
    }
}

impl Default for RetryPolicy {
    /// Scanner delivery default: 5 attempts, 100 ms apart.
    fn default() -> Self {
        Self::fixed(5, Duration::from_millis(100))
    }
}

/// Run `operation` until it succeeds, a non-retryable error occurs, or
/// the attempt bound is exhausted. Exactly `max_attempts` calls are made
/// in the worst case; the last error is returned.
pub async fn retry<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut operation: F,
    retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                if attempt >= policy.max_attempts || !retryable(&e) {
                    return Err(e);
                }
                let delay = policy.delay_for_attempt(attempt - 1);
                debug!(attempt, error = %e, ?delay, "delivery failed, retrying");
                sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
