//! Mapping of Gemini failures onto remote error kinds.

use super::dto::{ErrorEnvelope, GenerateContentResponse, InlineData};
use toolsmith_core::RemoteMode;
use toolsmith_error::{RemoteError, RemoteErrorKind};

const SAFETY_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
    "IMAGE_SAFETY",
];

/// Classifies a non-2xx response.
#[track_caller]
pub(crate) fn status_error(status: u16, body: &str) -> RemoteError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = parsed
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    let api_status = parsed.map(|e| e.error.status).unwrap_or_default();

    let kind = match (status, api_status.as_str()) {
        (429, _) | (_, "RESOURCE_EXHAUSTED") => RemoteErrorKind::QuotaExceeded(message),
        (401 | 403, _) | (_, "UNAUTHENTICATED" | "PERMISSION_DENIED") => {
            RemoteErrorKind::Unauthorized(message)
        }
        _ => RemoteErrorKind::Http {
            status_code: status,
            message,
        },
    };
    RemoteError::new(kind)
}

/// Classifies a transport failure.
#[track_caller]
pub(crate) fn transport_error(err: &reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::new(RemoteErrorKind::Timeout(err.to_string()))
    } else {
        RemoteError::new(RemoteErrorKind::Network(err.to_string()))
    }
}

fn data_uri(inline: &InlineData) -> String {
    format!("data:{};base64,{}", inline.mime_type, inline.data)
}

/// Pulls the payload out of a successful response.
///
/// Text modes concatenate the text parts. Image mode returns the first
/// inline image as a data URI.
pub(crate) fn extract_payload(
    response: &GenerateContentResponse,
    mode: RemoteMode,
) -> Result<String, RemoteError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_ref())
    {
        return Err(RemoteError::new(RemoteErrorKind::SafetyBlocked(
            reason.clone(),
        )));
    }

    let candidate = response.candidates.first().ok_or_else(|| {
        RemoteError::new(RemoteErrorKind::InvalidResponse(
            "Response contained no candidates".to_string(),
        ))
    })?;

    if let Some(reason) = candidate
        .finish_reason
        .as_deref()
        .filter(|r| SAFETY_FINISH_REASONS.contains(r))
    {
        return Err(RemoteError::new(RemoteErrorKind::SafetyBlocked(
            reason.to_string(),
        )));
    }

    let parts = candidate
        .content
        .as_ref()
        .map(|c| c.parts.as_slice())
        .unwrap_or_default();

    let payload = match mode {
        RemoteMode::Image => parts
            .iter()
            .find_map(|p| p.inline_data.as_ref())
            .map(data_uri),
        RemoteMode::Text | RemoteMode::AnalyzeImage => {
            let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
            Some(text).filter(|t| !t.trim().is_empty())
        }
    };

    payload.ok_or_else(|| {
        RemoteError::new(RemoteErrorKind::InvalidResponse(format!(
            "Response contained no {} output",
            mode
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolsmith_error::RetryableError;

    fn response(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let quota = status_error(
            429,
            r#"{"error":{"message":"Quota","status":"RESOURCE_EXHAUSTED"}}"#,
        );
        assert!(matches!(quota.kind, RemoteErrorKind::QuotaExceeded(ref m) if m == "Quota"));
        assert!(!quota.is_retryable());

        assert!(matches!(
            status_error(403, "forbidden").kind,
            RemoteErrorKind::Unauthorized(_)
        ));

        let unavailable = status_error(
            503,
            r#"{"error":{"message":"overloaded","status":"UNAVAILABLE"}}"#,
        );
        assert!(unavailable.is_retryable());
        assert_eq!(
            unavailable.kind,
            RemoteErrorKind::Http {
                status_code: 503,
                message: "overloaded".to_string()
            }
        );

        let bad = status_error(400, "not json");
        assert!(!bad.is_retryable());
    }

    #[test]
    fn test_safety_finish_reason_blocks() {
        let blocked = response(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#);
        let err = extract_payload(&blocked, RemoteMode::Text).unwrap_err();
        assert!(matches!(err.kind, RemoteErrorKind::SafetyBlocked(_)));

        let prompt_blocked = response(r#"{"promptFeedback":{"blockReason":"OTHER"}}"#);
        assert!(extract_payload(&prompt_blocked, RemoteMode::Text).is_err());
    }

    #[test]
    fn test_text_parts_are_joined() {
        let ok = response(concat!(
            r##"{"candidates":[{"content":{"parts":[{"text":"# Title\n"},{"text":"Body"}]},"##,
            r#""finishReason":"STOP"}]}"#,
        ));
        assert_eq!(
            extract_payload(&ok, RemoteMode::Text).unwrap(),
            "# Title\nBody"
        );
    }

    #[test]
    fn test_image_mode_returns_data_uri() {
        let ok = response(concat!(
            r#"{"candidates":[{"content":{"parts":[{"text":"Here you go"},"#,
            r#"{"inlineData":{"mimeType":"image/png","data":"AAAA"}}]}}]}"#,
        ));
        assert_eq!(
            extract_payload(&ok, RemoteMode::Image).unwrap(),
            "data:image/png;base64,AAAA"
        );
        let text_only = response(r#"{"candidates":[{"content":{"parts":[{"text":"sorry"}]}}]}"#);
        assert!(matches!(
            extract_payload(&text_only, RemoteMode::Image).unwrap_err().kind,
            RemoteErrorKind::InvalidResponse(_)
        ));
    }
}
