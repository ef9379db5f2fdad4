//! Configuration module for photag
//!
//! Manages application configuration: library location, thumbnail and search
//! defaults, store timeout and logging level. Configuration is stored in the
//! user's config directory and can be overridden with `PHOTAG_*` environment
//! variables.

mod setup;

pub use setup::first_time_setup;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "PHOTAG";

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PhotagConfig {
    /// Location of the library database
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Edge length in pixels for thumbnails when none is given
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,

    /// Per-call limit for photo store operations; unlimited when unset
    #[serde(default)]
    pub store_timeout_secs: Option<u64>,

    /// Maximum number of search hits shown
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Log filter directive used when `PHOTAG_LOG` is unset
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_database() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("photag")
        .join("library")
}

const fn default_thumbnail_size() -> u32 {
    200
}

const fn default_search_limit() -> usize {
    50
}

impl Default for PhotagConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            thumbnail_size: default_thumbnail_size(),
            store_timeout_secs: None,
            search_limit: default_search_limit(),
            quiet: false,
            log_level: None,
        }
    }
}

impl PhotagConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("photag").join("config.toml"))
    }

    /// Load configuration from `path` with environment overrides applied
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or a value has the wrong type.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn build(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(env.try_parsing(true))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be determined or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration as TOML at `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Load configuration, running first-time setup if config doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or creating the configuration fails.
    pub fn load_or_setup() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            first_time_setup()
        }
    }

    /// Store call limit as a duration; zero counts as unset
    #[must_use]
    pub fn store_timeout(&self) -> Option<Duration> {
        self.store_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
