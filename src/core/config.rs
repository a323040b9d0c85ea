use crate::core::sample_ingestor::WorldLandmarkSource;
use crate::models::pose::HandTrackingConfig;
use crate::platform::pose::validate_config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureConfig {
    /// File name suggested when creating a new dataset
    pub default_dataset_name: String,
    /// Where `Backup` writes its snapshot (relative paths resolve against the working directory)
    pub backup_path: PathBuf,
    /// Delay between processed camera frames, in milliseconds
    pub detection_interval_ms: u64,
    /// What fills the world landmark columns
    pub world_landmarks: WorldLandmarkSource,
    /// Hand landmark model settings
    pub hand_tracking: HandTrackingConfig,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            default_dataset_name: "dataset.csv".to_string(),
            backup_path: PathBuf::from("backup.csv"),
            detection_interval_ms: 20,
            world_landmarks: WorldLandmarkSource::Detector,
            hand_tracking: HandTrackingConfig::default(),
        }
    }
}

impl CaptureConfig {
    /// Load configuration from the default location, creating it with defaults if missing
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let config: CaptureConfig = serde_json::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::get_config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_dataset_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default dataset name cannot be empty".to_string(),
            ));
        }

        if self.backup_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("backup path cannot be empty".to_string()));
        }

        // 1ms..1s keeps the preview responsive without spinning
        if self.detection_interval_ms == 0 || self.detection_interval_ms > 1000 {
            return Err(ConfigError::Invalid(format!(
                "Invalid detection interval: {}ms. Must be between 1 and 1000",
                self.detection_interval_ms
            )));
        }

        validate_config(&self.hand_tracking).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(())
    }

    /// Reset to default configuration
    pub fn reset() -> ConfigResult<Self> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    pub fn detection_interval(&self) -> Duration {
        Duration::from_millis(self.detection_interval_ms)
    }

    /// Get the configuration file path
    fn get_config_path() -> ConfigResult<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| ConfigError::NoHomeDir)?;

        let mut path = PathBuf::from(home);
        path.push(".signcapture");
        path.push("config");
        path.push("settings.json");

        Ok(path)
    }
}
