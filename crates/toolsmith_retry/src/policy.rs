//! Retry loop with exponential backoff.

use crate::{RetryConfig, Sleeper, TokioSleeper};
use std::future::Future;
use std::time::Duration;
use toolsmith_error::RetryableError;
use tracing::{debug, instrument, warn};

/// Progress of one retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryAttempt {
    /// 1-based number of the attempt about to run (or just run).
    pub attempt_number: u32,
    /// Delay to wait before the next attempt.
    pub next_delay: Duration,
}

impl RetryAttempt {
    /// State before the first attempt.
    pub fn first(config: &RetryConfig) -> Self {
        Self {
            attempt_number: 1,
            next_delay: config.initial_delay(),
        }
    }

    /// Moves to the next attempt, growing the delay up to the cap.
    pub fn advance(self, config: &RetryConfig) -> Self {
        Self {
            attempt_number: self.attempt_number + 1,
            next_delay: config.grow(self.next_delay),
        }
    }

    /// True once all retries have been spent.
    pub fn exhausted(&self, config: &RetryConfig) -> bool {
        self.attempt_number > config.max_retries
    }
}

/// Delays the policy waits between attempts, in order.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use toolsmith_retry::{BackoffSchedule, RetryConfig};
///
/// let delays: Vec<u128> = BackoffSchedule::new(&RetryConfig::default())
///     .take(6)
///     .map(|d| d.as_millis())
///     .collect();
/// assert_eq!(delays, vec![1000, 2000, 4000, 8000, 10000, 10000]);
/// ```
#[derive(Debug, Clone)]
pub struct BackoffSchedule {
    config: RetryConfig,
    next: Duration,
}

impl BackoffSchedule {
    /// Unbounded schedule for `config`; `take(max_retries)` bounds it.
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            config: config.clone(),
            next: config.initial_delay(),
        }
    }
}

impl Iterator for BackoffSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next;
        self.next = self.config.grow(current);
        Some(current)
    }
}

/// Retries an operation with exponential backoff using the tokio timer.
///
/// The operation runs at most `max_retries + 1` times. A failure that
/// `is_retryable` rejects is returned immediately without waiting.
pub async fn retry_with_backoff<F, Fut, T, E, C>(
    config: &RetryConfig,
    is_retryable: C,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    C: Fn(&E) -> bool,
{
    retry_with_sleeper(config, &TokioSleeper, is_retryable, operation).await
}

/// Retries an operation, classifying failures with [`RetryableError`].
pub async fn retry_default<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + std::fmt::Display,
{
    retry_with_backoff(config, |e: &E| e.is_retryable(), operation).await
}

/// Retries an operation, waiting through the supplied [`Sleeper`].
#[instrument(skip_all, fields(max_retries = config.max_retries))]
pub async fn retry_with_sleeper<S, F, Fut, T, E, C>(
    config: &RetryConfig,
    sleeper: &S,
    is_retryable: C,
    mut operation: F,
) -> Result<T, E>
where
    S: Sleeper + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    C: Fn(&E) -> bool,
{
    let mut state = RetryAttempt::first(config);

    loop {
        debug!(attempt = state.attempt_number, "Executing operation");

        match operation().await {
            Ok(result) => {
                if state.attempt_number > 1 {
                    debug!(attempt = state.attempt_number, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(err) => {
                if !is_retryable(&err) {
                    warn!(
                        attempt = state.attempt_number,
                        error = %err,
                        "Error is not retryable, failing immediately"
                    );
                    return Err(err);
                }

                if state.exhausted(config) {
                    warn!(
                        attempt = state.attempt_number,
                        error = %err,
                        "All retry attempts exhausted"
                    );
                    return Err(err);
                }

                debug!(
                    attempt = state.attempt_number,
                    delay_ms = state.next_delay.as_millis() as u64,
                    error = %err,
                    "Retrying after failure"
                );
                sleeper.sleep(state.next_delay).await;
                state = state.advance(config);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_exhaustion() {
        let config = RetryConfig::default().with_max_retries(2);
        let first = RetryAttempt::first(&config);
        assert!(!first.exhausted(&config));
        let third = first.advance(&config).advance(&config);
        assert_eq!(third.attempt_number, 3);
        assert!(third.exhausted(&config));
        assert_eq!(third.next_delay, Duration::from_millis(4000));
    }

    #[test]
    fn test_schedule_respects_custom_factor() {
        let config = RetryConfig::default()
            .with_initial_delay(Duration::from_millis(100))
            .with_backoff_factor(3.0)
            .with_max_delay(Duration::from_millis(2000));
        let delays: Vec<u128> = BackoffSchedule::new(&config)
            .take(5)
            .map(|d| d.as_millis())
            .collect();
        assert_eq!(delays, vec![100, 300, 900, 2000, 2000]);
    }
}
