//! netintent CLI configuration stored at `~/.netintent/config.json`.
//!
//! The config file location (highest priority first):
//! 1. `NETINTENT_CONFIG` environment variable
//! 2. `~/.netintent/config.json`
//!
//! A missing file means defaults. Command-line flags override whatever the
//! file says.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use netintent_common::telemetry::LogFormat;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const CONFIG_DIR_NAME: &str = ".netintent";
const CONFIG_FILE_NAME: &str = "config.json";
const NETINTENT_CONFIG_ENV: &str = "NETINTENT_CONFIG";

/// Manifest output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Multi-document YAML
    #[default]
    Yaml,
    /// Pretty-printed JSON array
    Json,
}

/// Persistent CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Default output format for `generate`.
    pub output: OutputFormat,
    /// Log line format.
    pub log_format: LogFormat,
    /// Whether manifests carry the real generation time. When false the
    /// timestamp is pinned to the UNIX epoch so output is reproducible.
    pub timestamps: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output: OutputFormat::default(),
            log_format: LogFormat::default(),
            timestamps: true,
        }
    }
}

/// Resolve the config file path.
pub fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(NETINTENT_CONFIG_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    let home =
        dirs::home_dir().ok_or_else(|| Error::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load config from the resolved path, returning default if missing.
pub fn load_config() -> Result<CliConfig> {
    load_config_from(&config_path()?)
}

/// Load config from `path`, returning default if missing.
pub fn load_config_from(path: &Path) -> Result<CliConfig> {
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let data = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&data)
        .map_err(|e| Error::config(format!("failed to parse {}: {}", path.display(), e)))
}
