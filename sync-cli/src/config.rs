//! Configuration loading for leadsync.
//!
//! Configuration is loaded from a TOML file (default: `leadsync.toml` in the
//! data directory). A missing file means defaults.

use anyhow::{Context, Result};
use leadsync_client::EngineConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the data directory when `--config` is not given.
pub const CONFIG_FILE: &str = "leadsync.toml";

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Remote API settings.
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Remote API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Host requests are sent to (default: https://us.pycon.org).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path prefix of every endpoint, part of the signed path (default: /2023/api/v1).
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Per-request deadline in milliseconds (default: 2000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://us.pycon.org".to_string()
}

fn default_api_prefix() -> String {
    "/2023/api/v1".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Config {
    /// Load from `explicit`, else from the data directory.
    ///
    /// An explicit path must exist; the data directory file is optional.
    pub async fn load(explicit: Option<&Path>, data_dir: &Path) -> Result<Self> {
        let (path, required): (PathBuf, bool) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (data_dir.join(CONFIG_FILE), false),
        };

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file {}", path.display()))
            }
        };

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parse a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Engine settings derived from the `[remote]` table.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_api_prefix(&self.remote.api_prefix)
            .with_timeout(Duration::from_millis(self.remote.timeout_ms))
    }
}
