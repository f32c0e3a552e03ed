//! Validation stage.

use crate::{FieldKind, ImageRequirement, ToolSpec};
use toolsmith_core::GenerationRequest;
use toolsmith_error::ValidationError;

/// Checks a request against its tool before any prompt is built.
///
/// # Errors
///
/// Returns the first problem found: output kind mismatch, a missing required
/// field, an option outside a select's choices, a failed domain check, or an
/// image that is missing, unexpected or invalid.
pub fn validate_request(
    tool: &ToolSpec,
    request: &GenerationRequest,
) -> Result<(), ValidationError> {
    if *request.output_kind() != tool.output_kind() {
        return Err(ValidationError::new(format!(
            "{} produces {} output, not {}",
            tool.name(),
            tool.output_kind(),
            request.output_kind()
        )));
    }

    let inputs = request.inputs();
    for field in tool.fields() {
        if inputs.is_missing(field.name()) {
            if *field.required() {
                return Err(ValidationError::missing_field(field.label()));
            }
            continue;
        }
        let value = inputs.text(field.name()).unwrap_or_default();
        if let FieldKind::Select(options) = field.kind() {
            if !options.iter().any(|o| o.eq_ignore_ascii_case(&value)) {
                return Err(ValidationError::new(format!(
                    "{} must be one of: {}",
                    field.label(),
                    options.join(", ")
                )));
            }
        }
        for check in field.checks() {
            check.check(field.label(), &value)?;
        }
    }

    match (tool.image(), request.image()) {
        (ImageRequirement::Required, None) => {
            Err(ValidationError::new("Please upload an image"))
        }
        (ImageRequirement::None, Some(_)) => Err(ValidationError::new(format!(
            "{} does not accept image uploads",
            tool.name()
        ))),
        (_, Some(image)) => image.validate().map(|_| ()),
        (_, None) => Ok(()),
    }
}
