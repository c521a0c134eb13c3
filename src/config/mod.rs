//! Configuration management for modelhub

pub mod schema;

pub use schema::{Config, LogFormat};

use crate::artifact::Registry;
use crate::error::{HubError, HubResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Per-project config file name, discovered by walking up from the cwd
pub const LOCAL_CONFIG_NAME: &str = ".modelhub.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("modelhub")
            .join("config.toml")
    }

    /// Walk up from `start` looking for a project-local config
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, falling back to defaults if the file is missing
    pub async fn load(&self) -> HubResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load the global config with an optional local config layered on top
    pub async fn load_merged(&self, local: Option<&Path>) -> HubResult<Config> {
        let global = self.load().await?;
        let Some(local) = local else {
            return Ok(global);
        };

        let mut overlay = self.load_from_file(local).await?;
        // A relative cache root in a project file is relative to that file
        if let (Some(root), Some(dir)) = (overlay.storage.local_root.as_ref(), local.parent()) {
            if root.is_relative() {
                overlay.storage.local_root = Some(dir.join(root));
            }
        }
        debug!("Merged local config {}", local.display());
        Ok(global.merge(overlay))
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> HubResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| HubError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| HubError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> HubResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            HubError::io(format!("writing config to {}", self.config_path.display()), e)
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> HubResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| HubError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a standalone registry file: a JSON or TOML table of artifacts.
///
/// `.json` files are parsed as JSON; anything else as TOML.
pub async fn load_registry(path: &Path) -> HubResult<Registry> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| HubError::io(format!("reading registry from {}", path.display()), e))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        toml::from_str(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| HubError::ConfigInvalid {
        path: path.to_path_buf(),
        reason,
    })
}
