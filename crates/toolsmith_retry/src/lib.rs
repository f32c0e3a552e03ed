//! Exponential backoff retry policy.
//!
//! Wraps any fallible async operation. Retryable failures are re-attempted
//! after growing, capped delays; non-retryable failures surface immediately.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod policy;
mod sleeper;

pub use config::RetryConfig;
pub use policy::{
    BackoffSchedule, RetryAttempt, retry_default, retry_with_backoff, retry_with_sleeper,
};
pub use sleeper::{RecordingSleeper, Sleeper, TokioSleeper};
