//! # Retry Executor
//!
//! Re-runs a fallible async operation with exponential backoff and jitter.
//!
//! The delay before retry `n` (starting at 0) is
//! `base_delay * 2^n + uniform(0, max_jitter)`. Sleeping goes through
//! `tokio::time::sleep`, so waiting never blocks a worker thread and paused
//! test clocks apply.
//!
//! # Examples
//!
//! ```ignore
//! use flight_aggregator::infrastructure::retry::{RetryExecutor, RetryPolicy};
//!
//! let executor = RetryExecutor::new(RetryPolicy::default());
//! let body = executor.execute(|| client.post_json(&url, &wire, Some(&token))).await?;
//! ```

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Backoff settings for the retry executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Creates a retry policy.
    #[must_use]
    pub fn new(max_retries: u32, base_delay: Duration, max_jitter: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_jitter,
        }
    }

    /// A policy that runs the operation exactly once.
    #[must_use]
    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    /// Returns the number of retries after the first attempt.
    #[inline]
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the base delay.
    #[inline]
    #[must_use]
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Returns the upper bound of the random jitter.
    #[inline]
    #[must_use]
    pub fn max_jitter(&self) -> Duration {
        self.max_jitter
    }

    /// Returns the backoff part of the delay before retry `attempt`, without
    /// jitter.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Returns the full delay before retry `attempt`, jitter included.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let jitter = self.max_jitter.mul_f64(rand::random::<f64>());
        self.backoff(attempt).saturating_add(jitter)
    }
}

/// Every attempt failed.
///
/// Wraps the last failure unchanged.
#[derive(Debug, Clone, Error)]
#[error("gave up after {attempts} attempts: {source}")]
pub struct RetryExhaustedError<E>
where
    E: std::error::Error + 'static,
{
    attempts: u32,
    source: E,
}

impl<E> RetryExhaustedError<E>
where
    E: std::error::Error + 'static,
{
    /// Creates an exhaustion error.
    #[must_use]
    pub fn new(attempts: u32, source: E) -> Self {
        Self { attempts, source }
    }

    /// Returns the number of attempts made.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns the last failure.
    #[must_use]
    pub fn last_error(&self) -> &E {
        &self.source
    }

    /// Consumes the error and returns the last failure.
    #[must_use]
    pub fn into_last_error(self) -> E {
        self.source
    }
}

/// Runs operations under a [`RetryPolicy`].
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Creates an executor.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy.
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs `operation` until it succeeds or the retries are used up.
    ///
    /// A successful result is returned as is, even when it is empty.
    ///
    /// # Errors
    ///
    /// Returns `RetryExhaustedError` carrying the last failure once
    /// `max_retries + 1` attempts have failed.
    pub async fn execute<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryExhaustedError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error + 'static,
    {
        let mut attempt: u32 = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if attempt >= self.policy.max_retries => {
                    tracing::warn!(
                        attempts = attempt + 1,
                        error = %error,
                        "giving up after final attempt"
                    );
                    return Err(RetryExhaustedError::new(attempt + 1, error));
                }
                Err(error) => {
                    let delay = self.policy.delay_for(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
