//! Configuration schema for modelhub
//!
//! Configuration is stored at `~/.config/modelhub/config.toml`

use crate::artifact::Registry;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Local cache settings
    pub storage: StorageConfig,

    /// Remote archive settings
    pub remote: RemoteConfig,

    /// Artifact registry, keyed by artifact name
    pub artifacts: Registry,
}

impl Config {
    /// Overlay `other` onto `self`: set values and artifact entries win
    pub fn merge(mut self, other: Config) -> Self {
        if other.general.log_format != LogFormat::default() {
            self.general.log_format = other.general.log_format;
        }
        if other.storage.local_root.is_some() {
            self.storage.local_root = other.storage.local_root;
        }
        if other.remote.base_url.is_some() {
            self.remote.base_url = other.remote.base_url;
        }
        if other.remote.connect_timeout_secs != RemoteConfig::default().connect_timeout_secs {
            self.remote.connect_timeout_secs = other.remote.connect_timeout_secs;
        }
        self.artifacts = self.artifacts.merged(other.artifacts);
        self
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// General application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: LogFormat,
}

/// Local cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Cache root (default: platform data dir + /modelhub)
    pub local_root: Option<PathBuf>,
}

impl StorageConfig {
    /// Default cache root, independent of where the binary is installed
    pub fn default_root() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("modelhub")
    }

    /// Effective cache root
    pub fn root(&self) -> PathBuf {
        self.local_root.clone().unwrap_or_else(Self::default_root)
    }
}

/// Remote archive configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the remote archive (needed only for push/remote-rm)
    pub base_url: Option<String>,

    /// TCP connect timeout in seconds (0 = none)
    pub connect_timeout_secs: u64,
}

impl RemoteConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        match self.connect_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            connect_timeout_secs: 30,
        }
    }
}
