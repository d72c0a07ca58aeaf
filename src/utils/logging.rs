//! Logging setup

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Pretty,
    /// JSON format for structured logging
    Json,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Logs go to stderr so progress
/// output on stdout stays machine readable. Calling this twice is harmless.
pub fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Logging initialized");
}

/// Validate a level name before handing it to the filter
pub fn is_valid_level(level: &str) -> bool {
    matches!(
        level.to_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    )
}
