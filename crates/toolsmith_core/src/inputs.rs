//! Structured form inputs supplied with a submission.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single form value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum InputValue {
    /// Free text or a selected option.
    Text(String),
    /// Checkbox state.
    Flag(bool),
}

impl InputValue {
    /// Returns the value as text, rendering flags as `true`/`false`.
    pub fn as_text(&self) -> String {
        match self {
            InputValue::Text(s) => s.clone(),
            InputValue::Flag(b) => b.to_string(),
        }
    }

    /// True for text that is empty after trimming. Flags are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            InputValue::Text(s) => s.trim().is_empty(),
            InputValue::Flag(_) => false,
        }
    }
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        InputValue::Text(s.to_string())
    }
}

/// Field name to value mapping for one submission.
///
/// # Examples
///
/// ```
/// use toolsmith_core::ToolInputs;
///
/// let inputs = ToolInputs::new()
///     .with("topic", "rust")
///     .with("formal", true);
/// assert_eq!(inputs.text("topic"), Some("rust".to_string()));
/// assert!(inputs.flag("formal"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolInputs(BTreeMap<String, InputValue>);

impl ToolInputs {
    /// Empty input set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<InputValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw access to a value.
    pub fn get(&self, key: &str) -> Option<&InputValue> {
        self.0.get(key)
    }

    /// Trimmed text value, `None` when absent or blank.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .filter(|v| !v.is_blank())
            .map(|v| v.as_text().trim().to_string())
    }

    /// Text value or a fallback.
    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or_else(|| default.to_string())
    }

    /// Checkbox value. Text values `true`, `yes`, `on` and `1` count as set.
    pub fn flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(InputValue::Flag(b)) => *b,
            Some(InputValue::Text(s)) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "on" | "1")
            }
            None => false,
        }
    }

    /// True when the field is absent or blank.
    pub fn is_missing(&self, key: &str) -> bool {
        self.0.get(key).is_none_or(InputValue::is_blank)
    }

    /// Iterates over all fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &InputValue)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<InputValue>> FromIterator<(K, V)> for ToolInputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_missing() {
        let inputs = ToolInputs::new().with("topic", "   ").with("tone", "dry");
        assert!(inputs.is_missing("topic"));
        assert!(inputs.is_missing("absent"));
        assert!(!inputs.is_missing("tone"));
        assert_eq!(inputs.text("topic"), None);
    }

    #[test]
    fn test_flag_from_text() {
        let inputs = ToolInputs::new().with("a", "Yes").with("b", "no").with("c", false);
        assert!(inputs.flag("a"));
        assert!(!inputs.flag("b"));
        assert!(!inputs.flag("c"));
        assert!(!inputs.flag("d"));
    }

    #[test]
    fn test_deserializes_mixed_values() {
        let inputs: ToolInputs =
            serde_json::from_str(r#"{"topic":"owls","symbols":true}"#).unwrap();
        assert_eq!(inputs.text("topic").as_deref(), Some("owls"));
        assert!(inputs.flag("symbols"));
    }
}
