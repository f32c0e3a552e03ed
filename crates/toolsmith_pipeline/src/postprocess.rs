//! Payload clean-up after a successful remote generation.

use crate::OutputFormat;
use regex::Regex;
use std::sync::LazyLock;

static WRAPPING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)\r?\n?```$").expect("valid fence regex")
});

/// Removes a code fence wrapping the entire payload, if any.
pub fn strip_wrapping_fence(payload: &str) -> &str {
    let trimmed = payload.trim();
    WRAPPING_FENCE
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed)
}

/// Normalizes a payload for display. Returns `None` if nothing usable is left.
pub fn finish_payload(format: OutputFormat, payload: &str) -> Option<String> {
    let cleaned = match format {
        OutputFormat::Markdown => payload.trim().to_string(),
        OutputFormat::Html => strip_wrapping_fence(payload).trim().to_string(),
        OutputFormat::Image => {
            let trimmed = payload.trim();
            if trimmed.is_empty() || trimmed.starts_with("data:image/") {
                trimmed.to_string()
            } else {
                format!("data:image/png;base64,{}", trimmed)
            }
        }
    };
    (!cleaned.is_empty()).then_some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_html_fence() {
        let raw = "```html\n<!DOCTYPE html>\n<html></html>\n```";
        assert_eq!(
            finish_payload(OutputFormat::Html, raw).unwrap(),
            "<!DOCTYPE html>\n<html></html>"
        );
    }

    #[test]
    fn test_leaves_inner_fences_in_markdown() {
        let md = "Intro\n\n```rust\nfn main() {}\n```";
        assert_eq!(finish_payload(OutputFormat::Markdown, md).unwrap(), md);
        assert_eq!(strip_wrapping_fence(md), md);
    }

    #[test]
    fn test_image_payloads_become_data_uris() {
        assert_eq!(
            finish_payload(OutputFormat::Image, "iVBORw0KGgo=").unwrap(),
            "data:image/png;base64,iVBORw0KGgo="
        );
        assert_eq!(
            finish_payload(OutputFormat::Image, "data:image/jpeg;base64,AA").unwrap(),
            "data:image/jpeg;base64,AA"
        );
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        assert!(finish_payload(OutputFormat::Markdown, "  \n ").is_none());
        assert!(finish_payload(OutputFormat::Html, "```html\n```").is_none());
    }
}
