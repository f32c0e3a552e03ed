//! Input validation error types.

use derive_more::{Display, Error};

/// Rejected user input, raised before any prompt is built.
#[derive(Debug, Clone, Display, Error)]
#[display("Validation Error: {} at line {} in {}", message, line, file)]
pub struct ValidationError {
    /// Human-readable reason, safe to show to the user
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Error for a required field left empty.
    #[track_caller]
    pub fn missing_field(label: &str) -> Self {
        Self::new(format!("{} is required", label))
    }
}
