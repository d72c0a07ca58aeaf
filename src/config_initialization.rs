//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::adapters::toml_config::AppConfig;
use crate::domain::model::FailurePolicy;
use crate::error::{CutError, CutResult};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "cut-videos.toml";

/// Load configuration following precedence: Env > File > Defaults.
///
/// An explicit `config_path` must exist; the default file is optional.
/// Command-line flags are applied on top by the caller.
pub fn load_configuration(config_path: Option<&Path>) -> CutResult<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_file(path)?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                AppConfig::load_from_file(&default_path)?
            } else {
                debug!("No config file found, using defaults");
                AppConfig::default()
            }
        }
    };

    let config = apply_environment_overrides(config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Override settings from `CUT_VIDEOS_*` variables resolved by `lookup`
pub fn apply_environment_overrides<F>(mut config: AppConfig, lookup: F) -> CutResult<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_overrides = 0;

    if let Some(value) = lookup("CUT_VIDEOS_FFMPEG") {
        config.ffmpeg_path = PathBuf::from(value);
        env_overrides += 1;
    }
    if let Some(value) = lookup("CUT_VIDEOS_FFPROBE") {
        config.ffprobe_path = PathBuf::from(value);
        env_overrides += 1;
    }
    if let Some(value) = lookup("CUT_VIDEOS_PROBE_TIMEOUT") {
        config.probe_timeout_secs = value.trim().parse().map_err(|_| CutError::Config {
            message: format!("Invalid CUT_VIDEOS_PROBE_TIMEOUT: {}", value),
        })?;
        env_overrides += 1;
    }
    if let Some(value) = lookup("CUT_VIDEOS_LOG_LEVEL") {
        config.log_level = value;
        env_overrides += 1;
    }
    if let Some(value) = lookup("CUT_VIDEOS_FAILURE_POLICY") {
        config.failure_policy = parse_failure_policy(&value)?;
        env_overrides += 1;
    }

    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }
    Ok(config)
}

fn parse_failure_policy(value: &str) -> CutResult<FailurePolicy> {
    match value.trim().to_lowercase().replace('-', "_").as_str() {
        "fail_fast" => Ok(FailurePolicy::FailFast),
        "continue_on_error" => Ok(FailurePolicy::ContinueOnError),
        other => Err(CutError::Config {
            message: format!("Invalid failure policy: {}", other),
        }),
    }
}
