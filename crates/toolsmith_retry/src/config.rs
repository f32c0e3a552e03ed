//! Retry policy configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry configuration for remote generation.
///
/// Delays are kept in milliseconds so the struct maps directly onto the
/// `[retry]` table of the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay.
    pub max_delay_ms: u64,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 10_000,
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    /// Policy that never retries.
    pub fn no_retry() -> Self {
        Self::default().with_max_retries(0)
    }

    /// Sets the retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the first delay.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Sets the delay cap.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Sets the multiplier.
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Delay before the first retry, capped.
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms.min(self.max_delay_ms))
    }

    /// Delay cap.
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// Next delay after `current`: `min(current * factor, max_delay)`.
    pub fn grow(&self, current: Duration) -> Duration {
        let next_ms = (current.as_millis() as f64 * self.backoff_factor)
            .round()
            .max(0.0);
        if next_ms >= self.max_delay_ms as f64 {
            self.max_delay()
        } else {
            Duration::from_millis(next_ms as u64)
        }
    }

    /// Worst-case total time spent waiting between attempts.
    pub fn total_wait(&self) -> Duration {
        crate::BackoffSchedule::new(self)
            .take(self.max_retries as usize)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_delay(), Duration::from_secs(1));
        assert_eq!(config.max_delay(), Duration::from_secs(10));
    }

    #[test]
    fn test_total_wait_is_bounded() {
        let config = RetryConfig::default().with_max_retries(6);
        // 1 + 2 + 4 + 8 + 10 + 10
        assert_eq!(config.total_wait(), Duration::from_secs(35));
        assert_eq!(RetryConfig::no_retry().total_wait(), Duration::ZERO);
    }

    #[test]
    fn test_partial_table_uses_defaults() {
        let config: RetryConfig = serde_json::from_str(r#"{"max_retries": 5}"#).unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.initial_delay_ms, 1000);
    }
}
