//! Tracing subscriber initialization.

use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Install the global tracing subscriber, writing to stderr.
///
/// Honors `RUST_LOG`; falls back to `default_filter` (e.g. `"info"`) when it
/// is unset or invalid. Calling this twice is harmless: the second call
/// reports that a subscriber already exists and returns `Err`.
pub fn init_tracing(default_filter: &str, format: LogFormat) -> Result<(), String> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let result = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    match result {
        Ok(()) => {
            info!(format = %format, "Tracing initialized");
            Ok(())
        }
        Err(e) => {
            debug!(error = %e, "Tracing subscriber already installed");
            Err(format!("Failed to install tracing subscriber: {}", e))
        }
    }
}
