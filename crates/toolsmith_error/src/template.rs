//! Prompt template error types.

use derive_more::{Display, Error};

/// A tool template could not produce a dispatch for the given inputs.
///
/// The message is user-facing: templates use it to explain which
/// combination of inputs is missing.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Template Error: {} at line {} in {}", message, line, file)]
pub struct TemplateError {
    /// Explanation shown to the user
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl TemplateError {
    /// Create a new TemplateError at the current location.
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
