//! Connection configuration
//!
//! Per-connection settings for the plugin: API token, regions to query, and
//! optional endpoint overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Connection configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConnectionConfig {
    /// Scalingo API token. Falls back to the SCALINGO_TOKEN environment
    /// variable when absent.
    #[serde(default)]
    pub token: Option<String>,
    /// Single region (legacy field, superseded by `regions`)
    #[serde(default)]
    pub region: Option<String>,
    /// Regions to fan list queries out to. When non-empty this takes
    /// precedence over `region`.
    #[serde(default)]
    pub regions: Option<Vec<String>>,
    /// Override for the regional API endpoint (private platforms, tests)
    #[serde(default)]
    pub api_endpoint: Option<String>,
    /// Override for the authentication API endpoint
    #[serde(default)]
    pub auth_endpoint: Option<String>,
    /// Override for the regional database API endpoint
    #[serde(default)]
    pub database_api_endpoint: Option<String>,
}

impl ConnectionConfig {
    /// Get the default config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("scalingo-tables").join("config.json"))
    }

    /// Load configuration.
    ///
    /// An explicitly named file must exist and parse; the default location is
    /// optional and falls back to an empty config (the token may still come
    /// from the environment).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read connection config {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Invalid connection config {}", path.display()));
        }

        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(serde_json::from_str(&content).unwrap_or_default()),
            Err(_) => Ok(Self::default()),
        }
    }
}
