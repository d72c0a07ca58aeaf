// TOML config adapter - Application settings loaded from TOML files

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::model::{FailurePolicy, VideoOption};
use crate::domain::options::OptionTables;
use crate::error::{CutError, CutResult};
use crate::utils::logging::is_valid_level;

/// Application configuration, every key optional in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub probe_timeout_secs: u64,
    pub failure_policy: FailurePolicy,
    pub log_level: String,
    pub log_json: bool,
    pub reveal_output: bool,
    /// Extra or replacement audio options, name to encoder flags
    pub audio_options: BTreeMap<String, String>,
    /// Extra or replacement video options by name
    pub video_options: BTreeMap<String, VideoOption>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            probe_timeout_secs: 30,
            failure_policy: FailurePolicy::FailFast,
            log_level: "info".to_string(),
            log_json: false,
            reveal_output: true,
            audio_options: BTreeMap::new(),
            video_options: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> CutResult<Self> {
        let config: AppConfig = toml::from_str(content).map_err(|e| CutError::Config {
            message: format!("Failed to parse TOML config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn load_from_file(path: &Path) -> CutResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CutError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        info!(file = %path.display(), "Loaded configuration");
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> CutResult<()> {
        if !is_valid_level(&self.log_level) {
            return Err(CutError::Config {
                message: format!("Invalid log level: {}", self.log_level),
            });
        }
        if self.probe_timeout_secs == 0 {
            return Err(CutError::Config {
                message: "probe_timeout_secs must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Built-in option tables merged with the configured extras
    pub fn option_tables(&self) -> OptionTables {
        OptionTables::with_extras(&self.audio_options, &self.video_options)
    }
}
