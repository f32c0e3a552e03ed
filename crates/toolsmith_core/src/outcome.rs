//! Terminal results of a submission.

use serde::{Deserialize, Serialize};

/// Why a submission failed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Missing or malformed input.
    Validation,
    /// Tool template could not build a prompt.
    Config,
    /// Remote generation failed.
    Remote,
    /// Not enough credits or daily quota.
    Credits,
}

/// Exactly-once result of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerationOutcome {
    /// Generated payload (markdown, HTML or image data URI).
    Success {
        /// The payload
        payload: String,
    },
    /// Displayable failure.
    Failure {
        /// Failure class
        reason: FailureReason,
        /// User-facing message
        message: String,
    },
}

impl GenerationOutcome {
    /// Success constructor.
    pub fn success(payload: impl Into<String>) -> Self {
        GenerationOutcome::Success {
            payload: payload.into(),
        }
    }

    /// Failure constructor.
    pub fn failure(reason: FailureReason, message: impl Into<String>) -> Self {
        GenerationOutcome::Failure {
            reason,
            message: message.into(),
        }
    }

    /// True for [`GenerationOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success { .. })
    }

    /// Payload of a successful outcome.
    pub fn payload(&self) -> Option<&str> {
        match self {
            GenerationOutcome::Success { payload } => Some(payload),
            GenerationOutcome::Failure { .. } => None,
        }
    }

    /// Failure class, if any.
    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            GenerationOutcome::Success { .. } => None,
            GenerationOutcome::Failure { reason, .. } => Some(*reason),
        }
    }

    /// Text to display: the payload or the error message.
    pub fn display_text(&self) -> &str {
        match self {
            GenerationOutcome::Success { payload } => payload,
            GenerationOutcome::Failure { message, .. } => message,
        }
    }
}
