//! Mirroring local directories to the remote archive
//!
//! Everything composes from three primitives on `RemoteStore`: create a
//! directory, put a file, delete a path. The remote has no implicit parent
//! creation, so `push` creates every prefix of the target directory, root
//! first, before the first upload. Those calls are issued unconditionally;
//! tolerating an existing directory is the backend's job.

mod http;

pub use http::HttpRemote;

use crate::error::{HubError, HubResult};
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// Directory-oriented remote storage
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Create one directory; its parent must already exist
    async fn mkdir(&self, path: &str) -> HubResult<()>;

    /// Upload a local file to `path`
    async fn put_file(&self, path: &str, local: &Path) -> HubResult<()>;

    /// Delete `path`
    async fn delete(&self, path: &str) -> HubResult<()>;
}

/// What a push did, in call order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushSummary {
    pub directories: Vec<String>,
    pub uploaded: Vec<String>,
    pub removed_source: bool,
}

/// Pushes local directories to, and deletes paths from, a remote store
#[derive(Clone)]
pub struct RemoteSync {
    store: Arc<dyn RemoteStore>,
}

impl RemoteSync {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Upload the direct child files of `local_dir` into `remote_dir`.
    ///
    /// Subdirectories are skipped. With `remove_source`, `local_dir` is
    /// deleted only after every upload succeeded; any failure returns early
    /// and leaves it untouched.
    pub async fn push(
        &self,
        local_dir: &Path,
        remote_dir: &str,
        remove_source: bool,
    ) -> HubResult<PushSummary> {
        let files = list_files(local_dir).await?;
        let mut summary = PushSummary::default();

        for prefix in remote_prefixes(remote_dir) {
            debug!("MKCOL {}", prefix);
            self.store.mkdir(&prefix).await?;
            summary.directories.push(prefix);
        }

        let base = normalize(remote_dir);
        for (filename, local) in files {
            let remote = if base.is_empty() {
                filename
            } else {
                format!("{}/{}", base, filename)
            };
            info!("Uploading {} -> {}", local.display(), remote);
            self.store.put_file(&remote, &local).await?;
            summary.uploaded.push(remote);
        }

        if remove_source {
            fs::remove_dir_all(local_dir)
                .await
                .map_err(|e| HubError::io(format!("removing {}", local_dir.display()), e))?;
            info!("Removed source directory {}", local_dir.display());
            summary.removed_source = true;
        }

        Ok(summary)
    }

    /// Delete a remote path with a single call.
    ///
    /// A path that normalizes to the archive root is refused.
    pub async fn remove(&self, remote_path: &str) -> HubResult<()> {
        let path = normalize(remote_path);
        if path.is_empty() {
            return Err(HubError::User(format!(
                "Refusing to delete the remote archive root ({:?})",
                remote_path
            )));
        }
        info!("Deleting remote {}", path);
        self.store.delete(&path).await
    }
}

/// Collapse `./`, empty segments and leading/trailing slashes
pub fn normalize(remote: &str) -> String {
    remote
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Every prefix of the remote path, root to leaf: `a/b` -> `a`, `a/b`
pub fn remote_prefixes(remote: &str) -> Vec<String> {
    let mut prefixes: Vec<String> = Vec::new();
    for segment in remote.split('/').filter(|s| !s.is_empty() && *s != ".") {
        let next = match prefixes.last() {
            Some(parent) => format!("{}/{}", parent, segment),
            None => segment.to_string(),
        };
        prefixes.push(next);
    }
    prefixes
}

/// Direct child files of `dir` in listing order
async fn list_files(dir: &Path) -> HubResult<Vec<(String, std::path::PathBuf)>> {
    let metadata = fs::metadata(dir)
        .await
        .map_err(|_| HubError::PathNotFound(dir.to_path_buf()))?;
    if !metadata.is_dir() {
        return Err(HubError::PathNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| HubError::io(format!("listing {}", dir.display()), e))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| HubError::io(format!("listing {}", dir.display()), e))?
    {
        let path = entry.path();
        // Follow symlinks so linked files are uploaded too
        let is_file = fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            warn!("Skipping non-file entry {}", path.display());
            continue;
        }
        files.push((entry.file_name().to_string_lossy().into_owned(), path));
    }
    Ok(files)
}
