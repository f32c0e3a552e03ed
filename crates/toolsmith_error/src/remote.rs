//! Remote generation error types and retry classification.

/// Remote generation error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RemoteErrorKind {
    /// API key not found in environment
    MissingApiKey(String),
    /// HTTP client could not be constructed
    ClientCreation(String),
    /// Connection-level failure (DNS, refused, reset)
    Network(String),
    /// Request did not complete in time
    Timeout(String),
    /// HTTP error with status code and message
    Http {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Provider refused the content on safety grounds
    SafetyBlocked(String),
    /// Quota or rate limit exhausted
    QuotaExceeded(String),
    /// Credentials rejected
    Unauthorized(String),
    /// Response body could not be understood
    InvalidResponse(String),
    /// Requested mode not offered by the provider
    UnsupportedMode(String),
}

impl std::fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteErrorKind::MissingApiKey(var) => {
                write!(f, "{} environment variable not set", var)
            }
            RemoteErrorKind::ClientCreation(msg) => {
                write!(f, "Failed to create HTTP client: {}", msg)
            }
            RemoteErrorKind::Network(msg) => write!(f, "Network failure: {}", msg),
            RemoteErrorKind::Timeout(msg) => write!(f, "Request timed out: {}", msg),
            RemoteErrorKind::Http {
                status_code,
                message,
            } => write!(f, "HTTP {} error: {}", status_code, message),
            RemoteErrorKind::SafetyBlocked(msg) => write!(f, "Blocked by safety filter: {}", msg),
            RemoteErrorKind::QuotaExceeded(msg) => write!(f, "Quota exceeded: {}", msg),
            RemoteErrorKind::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            RemoteErrorKind::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            RemoteErrorKind::UnsupportedMode(msg) => write!(f, "Unsupported mode: {}", msg),
        }
    }
}

impl RemoteErrorKind {
    /// Check if this error type should be retried.
    ///
    /// Network failures, timeouts and server-side (5xx) statuses are transient.
    /// 408 counts as a timeout. Quota, auth, safety and other 4xx responses are
    /// permanent for the lifetime of one submission.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteErrorKind::Network(_) | RemoteErrorKind::Timeout(_) => true,
            RemoteErrorKind::Http { status_code, .. } => {
                *status_code == 408 || (500..=599).contains(status_code)
            }
            _ => false,
        }
    }

    /// Message shown to the user once the pipeline gives up.
    pub fn user_message(&self) -> String {
        match self {
            RemoteErrorKind::SafetyBlocked(_) => {
                "The request was blocked by the content safety filter. Please rephrase and try \
                 again."
                    .to_string()
            }
            RemoteErrorKind::QuotaExceeded(_) => {
                "The generation service is over its usage quota. Please try again later."
                    .to_string()
            }
            RemoteErrorKind::Unauthorized(_) | RemoteErrorKind::MissingApiKey(_) => {
                "The generation service rejected our credentials. Please contact support."
                    .to_string()
            }
            RemoteErrorKind::UnsupportedMode(msg) => format!("This tool is unavailable: {}", msg),
            _ => "Generation failed, please retry.".to_string(),
        }
    }
}

/// Remote error with source location tracking.
///
/// # Examples
///
/// ```
/// use toolsmith_error::{RemoteError, RemoteErrorKind, RetryableError};
///
/// let err = RemoteError::new(RemoteErrorKind::Http {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
/// assert!(err.is_retryable());
/// assert!(format!("{}", err).contains("HTTP 503"));
/// ```
#[derive(Debug, Clone)]
pub struct RemoteError {
    /// The kind of error that occurred
    pub kind: RemoteErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RemoteError {
    /// Create a new RemoteError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RemoteErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an HTTP status failure.
    #[track_caller]
    pub fn http(status_code: u16, message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Http {
            status_code,
            message: message.into(),
        })
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Remote Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for RemoteError {}

/// Trait for errors that support retry logic.
///
/// Lets an error type decide whether a failed operation is worth another
/// attempt. The retry policy consults this when no explicit classifier is
/// supplied.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for RemoteError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retryable() {
        for status in [500, 502, 503, 504, 599, 408] {
            assert!(RemoteError::http(status, "x").is_retryable(), "{status}");
        }
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        for status in [400, 401, 403, 404, 422, 429] {
            assert!(!RemoteError::http(status, "x").is_retryable(), "{status}");
        }
    }

    #[test]
    fn test_transport_errors_are_retryable() {
        assert!(RemoteErrorKind::Network("reset".into()).is_retryable());
        assert!(RemoteErrorKind::Timeout("30s".into()).is_retryable());
        assert!(!RemoteErrorKind::SafetyBlocked("SAFETY".into()).is_retryable());
        assert!(!RemoteErrorKind::QuotaExceeded("daily".into()).is_retryable());
    }

    #[test]
    fn test_safety_message_is_specific() {
        let msg = RemoteErrorKind::SafetyBlocked("SAFETY".into()).user_message();
        assert!(msg.contains("safety"));
        let generic = RemoteErrorKind::Timeout("t".into()).user_message();
        assert_eq!(generic, "Generation failed, please retry.");
    }
}
