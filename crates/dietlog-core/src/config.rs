//! Configuration loading for Dietlog.
//!
//! Settings come from `~/.config/dietlog/config.toml` when it exists,
//! optionally overridden by an explicit file path; every field has a
//! default so the service runs with no config file at all.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{DietlogError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DietlogConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Custom path for the SQLite database. Defaults to
    /// `~/.config/dietlog/dietlog.db`.
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_web_port")]
    pub port: u16,
    #[serde(default = "default_web_host")]
    pub host: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            host: default_web_host(),
        }
    }
}

fn default_web_port() -> u16 {
    3333
}

fn default_web_host() -> String {
    "127.0.0.1".to_string()
}

/// Path of the global config file (`~/.config/dietlog/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dietlog").join("config.toml"))
}

impl DietlogConfig {
    /// Load configuration, layering the global file under an optional
    /// explicit one.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        let config = builder
            .build()
            .map_err(|e| DietlogError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| DietlogError::Config(e.to_string()))
    }

    /// Load with defaults only (no files).
    pub fn default_config() -> Self {
        Self::default()
    }
}
