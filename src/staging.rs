//! Stage-then-publish helpers
//!
//! Content is written next to its canonical path under a hidden, unique
//! name and only renamed into place once complete. A canonical path that
//! exists is therefore always complete, which keeps "path exists" a sound
//! cache-hit test across crashes and concurrent invocations.

use crate::error::{HubError, HubResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// `<dir>/.<name>.<tag>-<uuid>` next to `target`
pub fn staging_sibling(target: &Path, tag: &str) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(target.file_name().unwrap_or_default());
    name.push(format!(".{}-{}", tag, uuid::Uuid::new_v4().simple()));
    target.with_file_name(name)
}

/// Whether a directory entry name belongs to an in-flight staging path
pub fn is_staging_name(name: &str) -> bool {
    name.starts_with('.')
        && [".partial-", ".part-", ".clone-"]
            .iter()
            .any(|tag| name.contains(tag))
}

/// Whether a path exists, surfacing permission errors instead of hiding them
pub async fn exists(path: &Path) -> HubResult<bool> {
    fs::try_exists(path)
        .await
        .map_err(|e| HubError::io(format!("checking {}", path.display()), e))
}

/// Create every missing parent of `path`
pub async fn ensure_parent(path: &Path) -> HubResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| HubError::io(format!("creating directory {}", parent.display()), e))?;
    }
    Ok(())
}

/// Rename a fully written staging directory onto its canonical path.
///
/// Returns `false` when another writer published the target first; the
/// staging copy is discarded in that case.
pub async fn publish_dir(staging: &Path, target: &Path) -> HubResult<bool> {
    match fs::rename(staging, target).await {
        Ok(()) => {
            debug!("Published {}", target.display());
            Ok(true)
        }
        Err(e) => {
            let published = exists(target).await?;
            discard_dir(staging).await;
            if published {
                debug!(
                    "{} already published ({}), discarded {}",
                    target.display(),
                    e,
                    staging.display()
                );
                return Ok(false);
            }
            Err(HubError::io(
                format!("publishing {} to {}", staging.display(), target.display()),
                e,
            ))
        }
    }
}

/// Best-effort removal of a staging directory
pub async fn discard_dir(path: &Path) {
    if let Err(e) = fs::remove_dir_all(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove staging directory {}: {}", path.display(), e);
        }
    }
}

/// Best-effort removal of a staging file
pub async fn discard_file(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove staging file {}: {}", path.display(), e);
        }
    }
}
