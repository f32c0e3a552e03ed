//! Remote driver selection.

use async_trait::async_trait;
use std::sync::Arc;
use toolsmith_core::RemoteCall;
use toolsmith_error::RemoteError;
use toolsmith_interface::GenerationDriver;
use toolsmith_models::{GeminiConfig, GeminiDriver};
use tracing::warn;

/// Driver used when no provider could be configured.
///
/// Every call fails with the configuration error, so local tools keep
/// working and remote tools report why they are unavailable.
#[derive(Debug, Clone)]
pub struct OfflineDriver {
    reason: RemoteError,
}

impl OfflineDriver {
    /// Driver that always fails with `reason`.
    pub fn new(reason: RemoteError) -> Self {
        Self { reason }
    }
}

#[async_trait]
impl GenerationDriver for OfflineDriver {
    async fn generate(&self, _call: &RemoteCall) -> Result<String, RemoteError> {
        Err(self.reason.clone())
    }

    fn provider_name(&self) -> &'static str {
        "offline"
    }

    fn model_name(&self) -> &str {
        "none"
    }
}

/// Gemini driver from the environment, or an [`OfflineDriver`] explaining why not.
pub fn remote_driver(config: &GeminiConfig) -> Arc<dyn GenerationDriver> {
    match GeminiDriver::from_env(config.clone()) {
        Ok(driver) => Arc::new(driver),
        Err(e) => {
            warn!(error = %e, "Remote generation unavailable");
            Arc::new(OfflineDriver::new(e))
        }
    }
}
