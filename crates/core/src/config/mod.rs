//! Backend configuration
//!
//! A single TOML file controls logging verbosity and which video driver to
//! use. The file is created with defaults the first time it is looked for.
//!
//! ```toml
//! version = 1
//! debug = false
//! video_driver = "psl1ght"
//! ```

mod loader;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use loader::{config_path, CONFIG_ENV, CONFIG_FILE_NAME};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Could not determine where the config file lives
    #[error("Config directory not available - could not resolve executable path")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Backend configuration, see [`config_path`] for its location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Video driver to use instead of the first available one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_driver: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            video_driver: None,
        }
    }
}

impl BackendConfig {
    /// Load the config, creating a default file if missing
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&config_path()?)
    }

    /// Save the config to its default location
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&config_path()?)
    }

    /// Re-read the config from its default location
    pub fn reload(&mut self) -> ConfigResult<()> {
        self.reload_from(&config_path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::debug!("Loaded backend config from {:?}", path);
            Ok(config)
        } else {
            let default = Self::default();
            default.save_to(path)?;
            tracing::info!("Created default backend config at {:?}", path);
            Ok(default)
        }
    }

    /// Save to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved backend config to {:?}", path);
        Ok(())
    }

    /// Replace self with the contents of `path`
    pub fn reload_from(&mut self, path: &Path) -> ConfigResult<()> {
        let content = std::fs::read_to_string(path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded backend config from {:?}", path);
        Ok(())
    }

    /// Default tracing filter directive for this config
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}
