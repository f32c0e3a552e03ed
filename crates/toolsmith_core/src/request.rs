//! Generation request types.

use crate::ToolInputs;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use toolsmith_error::ValidationError;

/// Largest accepted decoded image upload (4 MiB).
pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// Kind of payload a tool produces.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputKind {
    /// Markdown or HTML text.
    #[default]
    Text,
    /// Image data URI.
    Image,
}

/// Base64-encoded binary upload (an image attached to the form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ImagePayload {
    /// MIME type, e.g. `image/png`
    mime: String,
    /// Base64 body without a data-URI prefix
    data_base64: String,
}

impl ImagePayload {
    /// Wraps an already encoded body.
    pub fn new(mime: impl Into<String>, data_base64: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            data_base64: data_base64.into(),
        }
    }

    /// Encodes raw bytes.
    pub fn from_bytes(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime, STANDARD.encode(bytes))
    }

    /// Parses a `data:<mime>;base64,<body>` URI.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the URI is not a base64 data URI.
    pub fn from_data_uri(uri: &str) -> Result<Self, ValidationError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| ValidationError::new("Image must be a data URI"))?;
        let (mime, body) = rest
            .split_once(";base64,")
            .ok_or_else(|| ValidationError::new("Image data URI must be base64 encoded"))?;
        Ok(Self::new(mime, body))
    }

    /// Renders the payload as a data URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.data_base64)
    }

    /// Checks mime type, encoding and size.
    ///
    /// # Errors
    ///
    /// Returns a validation error for non-image mime types, undecodable bodies,
    /// or bodies larger than [`MAX_IMAGE_BYTES`].
    pub fn validate(&self) -> Result<usize, ValidationError> {
        if !self.mime.starts_with("image/") {
            return Err(ValidationError::new(format!(
                "Unsupported file type {}; please upload an image",
                self.mime
            )));
        }
        let bytes = STANDARD
            .decode(self.data_base64.trim())
            .map_err(|e| ValidationError::new(format!("Image upload is corrupted: {}", e)))?;
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::new(format!(
                "Image is {} bytes; the limit is 4 MB",
                bytes.len()
            )));
        }
        Ok(bytes.len())
    }
}

/// One user submission for a tool.
///
/// # Examples
///
/// ```
/// use toolsmith_core::{GenerationRequestBuilder, OutputKind, ToolInputs};
///
/// let request = GenerationRequestBuilder::default()
///     .tool_id("hex-to-rgb")
///     .inputs(ToolInputs::new().with("hex", "FF0000"))
///     .build()
///     .unwrap();
/// assert_eq!(*request.output_kind(), OutputKind::Text);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct GenerationRequest {
    /// Catalog identifier of the tool
    tool_id: String,
    /// Structured form inputs
    #[builder(default)]
    inputs: ToolInputs,
    /// Optional uploaded image
    #[builder(default)]
    image: Option<ImagePayload>,
    /// Expected payload kind
    #[builder(default)]
    output_kind: OutputKind,
}

impl GenerationRequest {
    /// Text request without an image.
    pub fn new(tool_id: impl Into<String>, inputs: ToolInputs) -> Self {
        Self {
            tool_id: tool_id.into(),
            inputs,
            image: None,
            output_kind: OutputKind::Text,
        }
    }

    /// Attaches an image.
    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.image = Some(image);
        self
    }

    /// Overrides the output kind.
    pub fn with_output_kind(mut self, output_kind: OutputKind) -> Self {
        self.output_kind = output_kind;
        self
    }
}
