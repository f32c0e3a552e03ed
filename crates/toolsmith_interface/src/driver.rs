//! Remote generation driver trait.

use async_trait::async_trait;
use toolsmith_core::RemoteCall;
use toolsmith_error::RemoteError;

/// Backend that turns a prompt into generated content.
///
/// Implementations return markdown/HTML text for text modes and an image data
/// URI for [`toolsmith_core::RemoteMode::Image`]. Errors must be classified
/// precisely enough for the retry policy to tell transient from permanent
/// failures.
#[async_trait]
pub trait GenerationDriver: Send + Sync {
    /// Performs one generation attempt. Retries are the caller's concern.
    async fn generate(&self, call: &RemoteCall) -> Result<String, RemoteError>;

    /// Provider name for logs.
    fn provider_name(&self) -> &'static str;

    /// Model used for text generation.
    fn model_name(&self) -> &str;
}
