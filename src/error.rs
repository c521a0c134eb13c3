//! Error types for modelhub
//!
//! All modules use `HubResult<T>` as their return type.

use crate::artifact::Category;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for modelhub operations
pub type HubResult<T> = Result<T, HubError>;

/// All errors that can occur in modelhub
#[derive(Error, Debug)]
pub enum HubError {
    // Registry errors
    #[error("Artifact not found in registry: {0}")]
    ArtifactNotFound(String),

    #[error("Artifact {name} has no {category} source configured")]
    SourceNotConfigured { name: String, category: Category },

    #[error("Cannot derive a file name from URL: {0}")]
    InvalidUrl(String),

    // Payload errors
    #[error("Unsupported archive format for {path}: expected .zip, got {extension}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Failed to expand archive {path}: {reason}")]
    Archive { path: PathBuf, reason: String },

    // Transport errors
    #[error("Transport failure for {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Remote archive URL not configured")]
    RemoteNotConfigured,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl HubError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a transport error
    pub fn transport(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::RemoteNotConfigured => {
                Some("Set [remote] base_url in the config file or pass --remote <URL>")
            }
            Self::ArtifactNotFound(_) => Some("Run: modelhub registry"),
            Self::UnsupportedFormat { .. } => Some("Datasets must be published as .zip archives"),
            Self::CommandFailed { command, .. } if command.starts_with("git") => {
                Some("Install git and make sure it is on PATH")
            }
            _ => None,
        }
    }
}
