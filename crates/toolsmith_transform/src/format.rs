//! Markdown helpers shared by the commands.

use derive_more::{Display, Error};

/// Why a command rejected its input. Rendered as markdown, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{message}")]
pub struct TransformError {
    message: String,
}

impl TransformError {
    /// Creates an error with a user-facing message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type for command implementations.
pub type TransformResult = Result<String, TransformError>;

/// Renders an input error.
pub fn error_markdown(message: &str) -> String {
    format!("**Error:** {}", message)
}

/// Positional parameter or empty string.
pub fn param(params: &[String], index: usize) -> &str {
    params.get(index).map(|s| s.trim()).unwrap_or_default()
}

/// Positional parameter without trimming, for free text.
pub fn raw_param(params: &[String], index: usize) -> &str {
    params.get(index).map(String::as_str).unwrap_or_default()
}

/// Parses a number, naming the field on failure.
pub fn parse_number(value: &str, label: &str) -> Result<f64, TransformError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| TransformError::new(format!("{} must be a number, got `{}`", label, value)))
}

/// Largest magnitude below which every whole `f64` is exact (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Smallest magnitude shown in fixed notation.
const MIN_FIXED: f64 = 1e-4;

/// Formats a number without trailing zeros: `10`, `2.5`, `0.3333`.
///
/// Magnitudes of 2^53 and above, and non-zero magnitudes below `0.0001`,
/// use scientific notation: `1e20`, `1.5e-7`.
pub fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite()
        || magnitude >= MAX_EXACT_INTEGER
        || (value != 0.0 && magnitude < MIN_FIXED)
    {
        return format!("{:e}", value);
    }
    if (value - value.round()).abs() < 1e-9 {
        return format!("{}", value.round() as i64);
    }
    let fixed = format!("{:.4}", value);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Parses a boolean flag parameter; empty means `default`.
pub fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "true" | "yes" | "on" | "1" => true,
        _ => false,
    }
}

/// Wraps text in a fenced code block.
pub fn fenced(language: &str, body: &str) -> String {
    format!("```{}\n{}\n```", language, body)
}
