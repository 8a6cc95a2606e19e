//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.usersync.toml` in the working directory
//! 4. `~/.config/usersync/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::constants::{
    CONFIG_DIR, CONFIG_FILENAME, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ENV_BASE_URL, ENV_FORMAT,
    ENV_MODE, ENV_TIMEOUT_SECS,
};
use crate::env::{Env, Parsed};
use crate::models::{Gender, StoreMode};
use crate::output::OutputFormat;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value in config file {path}: {reason}")]
    InvalidValue { path: PathBuf, reason: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub records: RecordsConfig,
    pub display: DisplayConfig,
}

/// Remote collection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL; the collection lives at `{base_url}/users`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub mode: StoreMode,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            mode: StoreMode::Remote,
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Record handling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    /// Gender filled in for fetched records that carry none.
    pub default_gender: Gender,
    /// Require name, username and email on create and update.
    pub validate: bool,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            default_gender: Gender::Male,
            validate: true,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub format: OutputFormat,
}

/// Values given on the command line. `None` leaves the loaded value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub mode: Option<StoreMode>,
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads the global config, then `.usersync.toml` in `workdir`, then
    /// applies environment variable overrides. CLI flags are applied
    /// separately with [`Config::apply_overrides`].
    pub fn load(workdir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: local config
        if let Some(dir) = workdir {
            let local_path = dir.join(CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        if config.remote.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                path: path.to_path_buf(),
                reason: "remote.timeout_secs must be at least 1".to_string(),
            });
        }
        Ok(config)
    }

    /// Get the global config file path.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR).join("config.toml"))
    }

    /// Layer 1: CLI flags.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(ref url) = overrides.base_url {
            self.remote.base_url = url.clone();
        }
        if let Some(secs) = overrides.timeout_secs {
            self.remote.timeout_secs = secs;
        }
        if let Some(mode) = overrides.mode {
            self.remote.mode = mode;
        }
        if let Some(format) = overrides.format {
            self.display.format = format;
        }
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        let default_remote = RemoteConfig::default();
        if other.remote.base_url != default_remote.base_url {
            self.remote.base_url = other.remote.base_url;
        }
        if other.remote.timeout_secs != default_remote.timeout_secs {
            self.remote.timeout_secs = other.remote.timeout_secs;
        }
        if other.remote.mode != default_remote.mode {
            self.remote.mode = other.remote.mode;
        }

        let default_records = RecordsConfig::default();
        if other.records.default_gender != default_records.default_gender {
            self.records.default_gender = other.records.default_gender;
        }
        // Disabling validation overrides enabling it.
        if !other.records.validate {
            self.records.validate = false;
        }

        if other.display.format != OutputFormat::default() {
            self.display.format = other.display.format;
        }
    }

    /// Apply environment variable overrides. Unparseable values are skipped.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(url) = env.var(ENV_BASE_URL) {
            self.remote.base_url = url;
        }

        match env.parsed::<u64>(ENV_TIMEOUT_SECS) {
            Parsed::Value(secs) if secs > 0 => self.remote.timeout_secs = secs,
            Parsed::Missing => {}
            Parsed::Value(_) | Parsed::Invalid(_) => {
                warn!("ignoring invalid {ENV_TIMEOUT_SECS} value");
            }
        }

        match env.parsed::<StoreMode>(ENV_MODE) {
            Parsed::Value(mode) => self.remote.mode = mode,
            Parsed::Missing => {}
            Parsed::Invalid(raw) => warn!("ignoring invalid {ENV_MODE} value: {raw}"),
        }

        match env.parsed::<OutputFormat>(ENV_FORMAT) {
            Parsed::Value(format) => self.display.format = format,
            Parsed::Missing => {}
            Parsed::Invalid(raw) => warn!("ignoring invalid {ENV_FORMAT} value: {raw}"),
        }
    }
}
