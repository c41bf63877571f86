//! Configuration management for catree.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `catree.toml` file
//! 3. User config `~/.config/catree/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hierarchy rule configuration.
    pub hierarchy: HierarchyConfig,

    /// Storage configuration.
    pub storage: StorageConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./catree.toml` (project local)
    /// 2. `~/.config/catree/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(PROJECT_CONFIG_FILE).exists() {
            return Self::from_file(PROJECT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(level) = lookup("CATREE_MIN_USABLE_LEVEL") {
            self.hierarchy.min_usable_level = level.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("CATREE_MIN_USABLE_LEVEL is not a number: {level}"))
            })?;
        }
        if let Some(depth) = lookup("CATREE_MAX_DEPTH") {
            self.hierarchy.max_depth = match depth.trim() {
                "" | "none" => None,
                value => Some(value.parse().map_err(|_| {
                    ConfigError::Invalid(format!("CATREE_MAX_DEPTH is not a number: {value}"))
                })?),
            };
        }
        if let Some(dir) = lookup("CATREE_DATA_DIR") {
            self.storage.data_dir = dir;
        }
        if let Some(filter) = lookup("CATREE_LOG") {
            self.logging.filter = filter;
        }
        Ok(())
    }

    /// Checks that the loaded values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hierarchy.validate()?;
        if self.storage.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.file_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Hierarchy rule configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Minimum level a category needs before it can be used for products.
    pub min_usable_level: u32,

    /// Maximum depth of the tree; unset means unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            min_usable_level: DEFAULT_MIN_USABLE_LEVEL,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl HierarchyConfig {
    /// Checks that the limits describe a tree categories can be used in.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_usable_level == 0 {
            return Err(ConfigError::Invalid(
                "hierarchy.min_usable_level must be at least 1".to_string(),
            ));
        }
        if let Some(max) = self.max_depth {
            if max == 0 {
                return Err(ConfigError::Invalid(
                    "hierarchy.max_depth must be at least 1".to_string(),
                ));
            }
            if max < self.min_usable_level {
                return Err(ConfigError::Invalid(format!(
                    "hierarchy.max_depth ({max}) is below min_usable_level ({})",
                    self.min_usable_level
                )));
            }
        }
        Ok(())
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the categories document (default: ".catree").
    pub data_dir: String,

    /// Categories document file name.
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            file_name: DEFAULT_CATEGORIES_FILE.to_string(),
        }
    }
}

impl StorageConfig {
    /// Get the data directory path.
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Get the full path to the categories document.
    pub fn categories_path(&self) -> PathBuf {
        self.data_path().join(&self.file_name)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"catree_core=debug"`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
