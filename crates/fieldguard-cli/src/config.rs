//! CLI configuration file.
//!
//! Lookup order for the file: `--config`, then `$FIELDGUARD_CONFIG`, then
//! `<config_dir>/fieldguard/config.toml`. Only a missing file at the default
//! location falls back to built-in defaults.

use std::path::{Path, PathBuf};

use fieldguard_acl::AclConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "FIELDGUARD_CONFIG";

/// Directory name under the platform config dir.
pub const PROJECT_NAME: &str = "fieldguard";

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Everything the `fieldguard` binary reads from its config file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Engine settings.
    pub acl: AclConfig,
}

/// Where a config path came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` flag.
    Flag(PathBuf),
    /// `$FIELDGUARD_CONFIG`.
    Env(PathBuf),
    /// Platform default location.
    Default(PathBuf),
}

impl ConfigSource {
    /// The path itself.
    pub fn path(&self) -> &Path {
        match self {
            Self::Flag(p) | Self::Env(p) | Self::Default(p) => p,
        }
    }
}

impl CliConfig {
    /// `<config_dir>/fieldguard/config.toml`, if the platform has a config dir.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PROJECT_NAME).join("config.toml"))
    }

    /// Resolves the config file location from the flag and environment.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<ConfigSource> {
        Self::resolve_with(explicit, std::env::var(CONFIG_ENV).ok())
    }

    fn resolve_with(explicit: Option<&str>, env: Option<String>) -> Option<ConfigSource> {
        if let Some(path) = explicit {
            return Some(ConfigSource::Flag(PathBuf::from(path)));
        }
        if let Some(path) = env.filter(|p| !p.is_empty()) {
            return Some(ConfigSource::Env(PathBuf::from(path)));
        }
        Self::default_config_path().map(ConfigSource::Default)
    }

    /// Loads the configuration.
    ///
    /// # Errors
    ///
    /// Fails if an explicitly named file is missing, or if any file found
    /// cannot be read or parsed.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match Self::resolve_config_path(explicit) {
            Some(source) => Self::load_from(&source),
            None => Ok(Self::default()),
        }
    }

    /// Loads from a resolved source.
    ///
    /// # Errors
    ///
    /// See [`CliConfig::load`].
    pub fn load_from(source: &ConfigSource) -> Result<Self> {
        let path = source.path();
        if !path.exists() {
            if let ConfigSource::Default(_) = source {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Serializes to pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}
