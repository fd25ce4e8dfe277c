//! Retry policy with exponential backoff

use std::fmt;
use std::future::Future;
use std::time::Duration;

use apiprobe_domain::Settings;

/// Default number of attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Default growth factor between retries.
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// How many times an operation is attempted and how long to wait in between.
///
/// The delay before retry `n` (1-based) is
/// `initial_delay * backoff_multiplier^(n - 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` below one is raised to one, and a
    /// multiplier below one or not finite becomes one.
    #[must_use]
    pub const fn new(max_attempts: u32, initial_delay: Duration, backoff_multiplier: f64) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            initial_delay,
            backoff_multiplier: if backoff_multiplier.is_finite() && backoff_multiplier >= 1.0 {
                backoff_multiplier
            } else {
                1.0
            },
        }
    }

    /// A policy that attempts exactly once.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(1, Duration::ZERO, 1.0)
    }

    /// Builds the default policy with the attempt count from settings.
    #[must_use]
    pub const fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.retry_count,
            DEFAULT_INITIAL_DELAY,
            DEFAULT_BACKOFF_MULTIPLIER,
        )
    }

    /// Maximum number of attempts.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait before retry number `retry` (1-based).
    ///
    /// Saturates at [`Duration::MAX`].
    #[must_use]
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Runs `operation` until it succeeds or the attempts are used up.
    ///
    /// The closure receives the 1-based attempt number. Each failed attempt
    /// that will be retried is logged at warn level.
    ///
    /// # Errors
    ///
    /// Returns [`RetryExhausted`] carrying the last error and the number of
    /// attempts made.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryExhausted<E>>
    where
        E: fmt::Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) if attempt >= self.max_attempts => {
                    return Err(RetryExhausted {
                        attempts: attempt,
                        error,
                    });
                }
                Err(error) => {
                    let delay = self.delay_before_retry(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        %error,
                        "Request attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            DEFAULT_INITIAL_DELAY,
            DEFAULT_BACKOFF_MULTIPLIER,
        )
    }
}

/// Last error of an operation that ran out of attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    /// Attempts made.
    pub attempts: u32,
    /// Error from the final attempt.
    pub error: E,
}
