//! Layered application configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use toolsmith_error::ConfigError;
use toolsmith_models::GeminiConfig;
use toolsmith_pipeline::PipelineConfig;
use toolsmith_retry::RetryConfig;
use tracing::{debug, instrument};

/// Built-in defaults, lowest precedence.
pub const DEFAULT_CONFIG: &str = include_str!("../toolsmith.toml");

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "TOOLSMITH";

/// Local transform settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct LocalConfig {
    /// Pause before showing a local result
    ux_delay_ms: u64,
}

/// Credit ledger settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct CreditsConfig {
    /// Balance of a newly opened account
    starting_balance: u32,
}

/// Daily usage quota.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct QuotaConfig {
    /// Generations allowed per day; unlimited when unset
    daily_limit: Option<u32>,
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct ToolsmithConfig {
    /// Backoff for remote calls
    retry: RetryConfig,
    /// Remote provider connection
    remote: GeminiConfig,
    /// Local transforms
    local: LocalConfig,
    /// Credits
    credits: CreditsConfig,
    /// Quota
    quota: QuotaConfig,
}

impl ToolsmithConfig {
    /// Loads configuration from every standard source.
    ///
    /// Precedence, lowest first: built-in defaults, the user config file, the
    /// `./toolsmith.toml` file, `explicit`, then `TOOLSMITH__SECTION__KEY`
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `explicit` is missing or any source is malformed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(&Self::search_paths(), explicit, None)
    }

    /// Optional config files, in increasing precedence.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("toolsmith").join("toolsmith.toml"));
        }
        paths.push(PathBuf::from("toolsmith.toml"));
        paths
    }

    /// Loads from explicit sources.
    ///
    /// `env` replaces the process environment when given.
    ///
    /// # Errors
    ///
    /// Returns an error if `explicit` is missing or any source is malformed.
    #[instrument(skip(env))]
    pub fn load_from(
        optional_files: &[PathBuf],
        explicit: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ));

        for path in optional_files {
            debug!(path = %path.display(), exists = path.exists(), "Config search path");
            builder = builder.add_source(config::File::from(path.as_path()).required(false));
        }

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        builder
            .build()
            .and_then(|c| c.try_deserialize::<ToolsmithConfig>())
            .map_err(|e| ConfigError::new(format!("Failed to load configuration: {}", e)))
    }

    /// Pipeline settings derived from this configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::builder()
            .retry(self.retry.clone())
            .local_ux_delay(Duration::from_millis(self.local.ux_delay_ms))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let config = ToolsmithConfig::load_from(&[], None, Some(config::Map::new())).unwrap();
        assert_eq!(config.retry(), &RetryConfig::default());
        assert_eq!(config.remote(), &GeminiConfig::default());
        assert_eq!(*config.local().ux_delay_ms(), 300);
        assert_eq!(*config.credits().starting_balance(), 10);
        assert_eq!(*config.quota().daily_limit(), None);
    }
}
