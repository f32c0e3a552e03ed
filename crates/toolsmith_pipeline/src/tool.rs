//! Tool definitions: form fields, templates and billing.

use derive_getters::Getters;
use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, LazyLock};
use toolsmith_core::{Dispatch, ImagePayload, OutputKind, ToolInputs};
use toolsmith_error::{TemplateError, ValidationError};

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").expect("valid hex regex"));

/// Pure function turning form inputs into a dispatch.
pub type Template = Arc<
    dyn Fn(&ToolInputs, Option<&ImagePayload>) -> Result<Dispatch, TemplateError> + Send + Sync,
>;

/// Form control kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Multi-line text.
    TextArea,
    /// One of a fixed set of options.
    Select(Vec<String>),
    /// Boolean checkbox.
    Checkbox,
}

/// Domain check applied to a field before the template runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldCheck {
    /// `#RGB` or `#RRGGBB`, `#` optional.
    HexColor,
    /// Any finite number.
    Number,
    /// Whole number within an inclusive range.
    IntegerRange(i64, i64),
    /// At most this many characters.
    MaxLength(usize),
}

impl FieldCheck {
    /// Validates `value` for the field labelled `label`.
    pub fn check(&self, label: &str, value: &str) -> Result<(), ValidationError> {
        let value = value.trim();
        match *self {
            FieldCheck::HexColor => {
                if !HEX_COLOR.is_match(value) {
                    return Err(ValidationError::new(format!(
                        "{} must be a hex color like #FF0000",
                        label
                    )));
                }
            }
            FieldCheck::Number => {
                if !value.parse::<f64>().is_ok_and(f64::is_finite) {
                    return Err(ValidationError::new(format!("{} must be a number", label)));
                }
            }
            FieldCheck::IntegerRange(min, max) => match value.parse::<i64>() {
                Ok(n) if (min..=max).contains(&n) => {}
                _ => {
                    return Err(ValidationError::new(format!(
                        "{} must be a whole number between {} and {}",
                        label, min, max
                    )));
                }
            },
            FieldCheck::MaxLength(max) => {
                if value.chars().count() > max {
                    return Err(ValidationError::new(format!(
                        "{} must be at most {} characters",
                        label, max
                    )));
                }
            }
        }
        Ok(())
    }
}

/// One form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct FieldSpec {
    /// Input key
    name: String,
    /// Label shown to the user
    label: String,
    /// Control kind
    kind: FieldKind,
    /// Must be present and non-blank
    required: bool,
    /// Domain checks
    checks: Vec<FieldCheck>,
}

impl FieldSpec {
    fn new(name: &str, label: &str, kind: FieldKind, required: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required,
            checks: Vec::new(),
        }
    }

    /// Required single-line text.
    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text, true)
    }

    /// Required multi-line text.
    pub fn textarea(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::TextArea, true)
    }

    /// Required select.
    pub fn select(name: &str, label: &str, options: &[&str]) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Select(options.iter().map(|s| s.to_string()).collect()),
            true,
        )
    }

    /// Optional checkbox.
    pub fn checkbox(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Checkbox, false)
    }

    /// Marks the field optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Adds a domain check.
    pub fn check(mut self, check: FieldCheck) -> Self {
        self.checks.push(check);
        self
    }
}

/// How a tool treats uploaded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ImageRequirement {
    /// Uploads are rejected.
    #[default]
    None,
    /// Uploads are accepted.
    Optional,
    /// An upload must be present.
    Required,
}

/// Post-processing applied to a successful payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown text.
    #[default]
    Markdown,
    /// Raw HTML; surrounding code fences are stripped.
    Html,
    /// Image data URI.
    Image,
}

impl OutputFormat {
    /// Output kind the format corresponds to.
    pub fn kind(&self) -> OutputKind {
        match self {
            OutputFormat::Image => OutputKind::Image,
            _ => OutputKind::Text,
        }
    }
}

/// A catalog entry.
#[derive(Clone, Getters)]
pub struct ToolSpec {
    /// Stable identifier used in URLs and requests
    id: String,
    /// Display name
    name: String,
    /// Catalog section
    category: String,
    /// One-line summary
    description: String,
    /// Form fields
    fields: Vec<FieldSpec>,
    /// Payload post-processing
    output_format: OutputFormat,
    /// Credits charged per successful generation (0 to 3)
    credit_cost: u32,
    /// Upload policy
    image: ImageRequirement,
    /// Prompt template
    #[getter(skip)]
    template: Template,
}

impl std::fmt::Debug for ToolSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSpec")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("output_format", &self.output_format)
            .field("credit_cost", &self.credit_cost)
            .finish_non_exhaustive()
    }
}

/// Highest credit cost a tool may declare.
pub const MAX_CREDIT_COST: u32 = 3;

impl ToolSpec {
    /// Creates a markdown tool with no fields and no cost.
    pub fn new<F>(id: &str, name: &str, category: &str, template: F) -> Self
    where
        F: Fn(&ToolInputs, Option<&ImagePayload>) -> Result<Dispatch, TemplateError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            description: String::new(),
            fields: Vec::new(),
            output_format: OutputFormat::Markdown,
            credit_cost: 0,
            image: ImageRequirement::None,
            template: Arc::new(template),
        }
    }

    /// Sets the description.
    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Adds a field.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Sets the output format.
    pub fn output(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Sets the credit cost, clamped to [`MAX_CREDIT_COST`].
    pub fn cost(mut self, credits: u32) -> Self {
        self.credit_cost = credits.min(MAX_CREDIT_COST);
        self
    }

    /// Sets the upload policy.
    pub fn accepts_image(mut self, requirement: ImageRequirement) -> Self {
        self.image = requirement;
        self
    }

    /// Output kind produced by this tool.
    pub fn output_kind(&self) -> OutputKind {
        self.output_format.kind()
    }

    /// Runs the template.
    pub fn build(
        &self,
        inputs: &ToolInputs,
        image: Option<&ImagePayload>,
    ) -> Result<Dispatch, TemplateError> {
        (self.template)(inputs, image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_checks() {
        assert!(FieldCheck::HexColor.check("Color", "#ff0000").is_ok());
        assert!(FieldCheck::HexColor.check("Color", "abc").is_ok());
        assert!(FieldCheck::HexColor.check("Color", "#ff00").is_err());
        assert!(FieldCheck::Number.check("Value", "12.5").is_ok());
        assert!(FieldCheck::Number.check("Value", "twelve").is_err());
        assert!(FieldCheck::IntegerRange(4, 128).check("Length", "3").is_err());
        assert!(FieldCheck::IntegerRange(4, 128).check("Length", "64").is_ok());
        assert!(FieldCheck::MaxLength(3).check("Name", "abcd").is_err());
    }

    #[test]
    fn test_cost_is_clamped() {
        let tool = ToolSpec::new("t", "T", "Test", |_, _| {
            Ok(Dispatch::local("UUID", Vec::<String>::new()))
        })
        .cost(9);
        assert_eq!(*tool.credit_cost(), MAX_CREDIT_COST);
    }
}
