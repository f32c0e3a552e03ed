//! Error types for the Toolsmith generation pipeline.
//!
//! Every error carries the file and line where it was raised. Domain errors
//! live in their own modules and fold into [`ToolsmithErrorKind`] so callers
//! can propagate any of them with `?`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod credit;
mod remote;
mod store;
mod template;
mod validation;

pub use config::ConfigError;
pub use credit::{CreditError, CreditErrorKind};
pub use remote::{RemoteError, RemoteErrorKind, RetryableError};
pub use store::StoreError;
pub use template::TemplateError;
pub use validation::ValidationError;

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum ToolsmithErrorKind {
    /// Invalid user input
    Validation(ValidationError),
    /// Tool template could not build a dispatch
    Template(TemplateError),
    /// Configuration error
    Config(ConfigError),
    /// Remote generation error
    Remote(RemoteError),
    /// Credit ledger error
    Credit(CreditError),
    /// Key-value store error
    Store(StoreError),
}

impl std::fmt::Display for ToolsmithErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolsmithErrorKind::Validation(e) => write!(f, "{}", e),
            ToolsmithErrorKind::Template(e) => write!(f, "{}", e),
            ToolsmithErrorKind::Config(e) => write!(f, "{}", e),
            ToolsmithErrorKind::Remote(e) => write!(f, "{}", e),
            ToolsmithErrorKind::Credit(e) => write!(f, "{}", e),
            ToolsmithErrorKind::Store(e) => write!(f, "{}", e),
        }
    }
}

/// Toolsmith error with kind discrimination.
#[derive(Debug)]
pub struct ToolsmithError(Box<ToolsmithErrorKind>);

impl ToolsmithError {
    /// Create a new error from a kind.
    pub fn new(kind: ToolsmithErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ToolsmithErrorKind {
        &self.0
    }
}

impl std::fmt::Display for ToolsmithError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Toolsmith Error: {}", self.0)
    }
}

impl std::error::Error for ToolsmithError {}

// Generic From implementation for any type that converts to ToolsmithErrorKind
impl<T> From<T> for ToolsmithError
where
    T: Into<ToolsmithErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl RetryableError for ToolsmithError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            ToolsmithErrorKind::Remote(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for Toolsmith operations.
pub type ToolsmithResult<T> = std::result::Result<T, ToolsmithError>;
