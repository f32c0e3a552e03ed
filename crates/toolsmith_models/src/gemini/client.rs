//! Gemini driver over the REST API.

use super::dto::{GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
use super::errors::{extract_payload, status_error, transport_error};
use async_trait::async_trait;
use derive_getters::Getters;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use toolsmith_core::{RemoteCall, RemoteMode};
use toolsmith_error::{RemoteError, RemoteErrorKind};
use toolsmith_interface::GenerationDriver;
use tracing::{debug, error, instrument};

/// Connection settings for [`GeminiDriver`].
///
/// Deserializes from the `[remote]` config section; every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct GeminiConfig {
    /// Model for text and image analysis
    model: String,
    /// Model for image generation
    image_model: String,
    /// API root, without trailing slash
    base_url: String,
    /// Environment variable holding the API key
    api_key_env: String,
    /// Per-request timeout in seconds
    timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl GeminiConfig {
    /// Overrides the API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the text model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the environment variable holding the API key.
    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = var.into();
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Google Gemini generation driver.
///
/// Text and image analysis go to the text model; image generation goes to
/// the image model and comes back as a data URI.
#[derive(Clone)]
pub struct GeminiDriver {
    client: Client,
    api_key: String,
    config: GeminiConfig,
}

impl std::fmt::Debug for GeminiDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiDriver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeminiDriver {
    /// Creates a driver with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    #[instrument(skip(api_key), fields(model = %config.model()))]
    pub fn new(api_key: impl Into<String>, config: GeminiConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RemoteError::new(RemoteErrorKind::ClientCreation(e.to_string())))?;

        debug!(
            url = %config.base_url(),
            image_model = %config.image_model(),
            timeout_secs = config.timeout_secs(),
            "Created Gemini driver"
        );

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Creates a driver reading the key from `config.api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteErrorKind::MissingApiKey`] if the variable is unset or empty.
    pub fn from_env(config: GeminiConfig) -> Result<Self, RemoteError> {
        let api_key = std::env::var(config.api_key_env())
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                RemoteError::new(RemoteErrorKind::MissingApiKey(config.api_key_env().clone()))
            })?;
        Self::new(api_key, config)
    }

    /// Driver settings.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn model_for(&self, mode: RemoteMode) -> &str {
        match mode {
            RemoteMode::Image => self.config.image_model(),
            RemoteMode::Text | RemoteMode::AnalyzeImage => self.config.model(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url().trim_end_matches('/'),
            model
        )
    }

    fn request_for(call: &RemoteCall) -> GenerateContentRequest {
        let mut parts = vec![Part::text(call.prompt().clone())];
        if let (RemoteMode::AnalyzeImage, Some(image)) = (call.mode(), call.image()) {
            parts.push(Part::image(image));
        }
        let request = GenerateContentRequest::user(parts);
        match call.mode() {
            RemoteMode::Image => request.with_generation_config(GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
                temperature: None,
            }),
            RemoteMode::Text | RemoteMode::AnalyzeImage => request,
        }
    }
}

#[async_trait]
impl GenerationDriver for GeminiDriver {
    #[instrument(skip(self, call), fields(mode = %call.mode(), model = tracing::field::Empty))]
    async fn generate(&self, call: &RemoteCall) -> Result<String, RemoteError> {
        let model = self.model_for(*call.mode());
        tracing::Span::current().record("model", model);
        let body = Self::request_for(call);

        debug!(prompt_len = call.prompt().len(), "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "HTTP request failed");
                transport_error(&e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "Gemini API error");
            return Err(status_error(status.as_u16(), &error_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                return transport_error(&e);
            }
            error!(error = ?e, "Failed to parse response");
            RemoteError::new(RemoteErrorKind::InvalidResponse(format!(
                "Failed to parse JSON: {}",
                e
            )))
        })?;

        debug!(candidates = parsed.candidates.len(), "Received response");
        extract_payload(&parsed, *call.mode())
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolsmith_core::ImagePayload;

    #[test]
    fn test_routes_models_by_mode() {
        let driver = GeminiDriver::new("key", GeminiConfig::default()).unwrap();
        assert_eq!(driver.model_for(RemoteMode::Text), "gemini-2.5-flash");
        assert_eq!(driver.model_for(RemoteMode::Image), "gemini-2.5-flash-image");
        assert!(
            driver
                .endpoint("m")
                .ends_with("/v1beta/models/m:generateContent")
        );
    }

    #[test]
    fn test_analysis_request_carries_image() {
        let image = ImagePayload::new("image/jpeg", "AAAA");
        let call = RemoteCall::new("Describe", RemoteMode::AnalyzeImage, Some(image));
        let request = GeminiDriver::request_for(&call);
        let parts = &request.contents()[0].parts;
        assert_eq!(parts.len(), 2);
        assert!(parts[1].inline_data.is_some());
        assert!(request.generation_config().is_none());
    }

    #[test]
    fn test_image_request_asks_for_image_modality() {
        let call = RemoteCall::new("A fox logo", RemoteMode::Image, None);
        let request = GeminiDriver::request_for(&call);
        let config = request.generation_config().as_ref().unwrap();
        assert!(config.response_modalities.contains(&"IMAGE".to_string()));
    }
}
