//! Key-value store error types.

use derive_more::{Display, Error};

/// Failure reading or writing session state.
#[derive(Debug, Clone, Display, Error)]
#[display("Store Error: {} at line {} in {}", message, line, file)]
pub struct StoreError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl StoreError {
    /// Create a new StoreError at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
