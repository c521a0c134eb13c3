//! Zip expansion into the canonical artifact directory
//!
//! Entries are unpacked into a hidden staging directory next to the
//! target, which is renamed onto the target only once every entry is on
//! disk. The archive file is removed after that rename.
//!
//! Archives that wrap everything in one top-level folder named like the
//! target (`foo.zip` containing `foo/...`) are unwrapped so the contents
//! land directly in `foo/` instead of `foo/foo/`.

use crate::artifact::paths::require_archive;
use crate::error::{HubError, HubResult};
use crate::staging;
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use zip::ZipArchive;

/// Expands downloaded archives
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExpander;

impl ArchiveExpander {
    pub fn new() -> Self {
        Self
    }

    /// Extract `archive` into `target`, then delete `archive`.
    ///
    /// Fails with `UnsupportedFormat` before any I/O when `archive` is not
    /// a `.zip`. Returns `target`, or the already-present directory if a
    /// concurrent writer published it first.
    pub async fn expand(&self, archive: &Path, target: &Path) -> HubResult<PathBuf> {
        require_archive(archive)?;

        let staging_dir = staging::staging_sibling(target, "partial");
        info!("Expanding {} -> {}", archive.display(), target.display());

        let unwrap_name = target.file_name().map(OsStr::to_os_string);
        let result = {
            let archive = archive.to_path_buf();
            let staging_dir = staging_dir.clone();
            tokio::task::spawn_blocking(move || {
                extract_zip(&archive, &staging_dir, unwrap_name.as_deref())
            })
            .await
            .map_err(|e| HubError::Internal(format!("extract task failed: {}", e)))?
        };

        let count = match result {
            Ok(count) => count,
            Err(e) => {
                staging::discard_dir(&staging_dir).await;
                return Err(e);
            }
        };
        debug!("Extracted {} entries from {}", count, archive.display());

        staging::publish_dir(&staging_dir, target).await?;

        // A concurrent expander of the same download may have removed it already
        match tokio::fs::remove_file(archive).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(HubError::io(
                    format!("removing archive {}", archive.display()),
                    e,
                ))
            }
        }

        Ok(target.to_path_buf())
    }
}

fn archive_error(archive: &Path, reason: impl ToString) -> HubError {
    HubError::Archive {
        path: archive.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Unpack every entry of `archive` under `into`, returning the entry count
fn extract_zip(archive: &Path, into: &Path, unwrap_name: Option<&OsStr>) -> HubResult<usize> {
    let file = File::open(archive)
        .map_err(|e| HubError::io(format!("opening archive {}", archive.display()), e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| archive_error(archive, e))?;

    let mut entries: Vec<(PathBuf, bool)> = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let entry = zip.by_index(i).map_err(|e| archive_error(archive, e))?;
        let name = entry.enclosed_name().ok_or_else(|| {
            archive_error(archive, format!("unsafe entry path {:?}", entry.name()))
        })?;
        entries.push((name, entry.is_dir()));
    }

    let prefix = unwrap_name.and_then(|name| shared_root(&entries, name));
    if let Some(ref prefix) = prefix {
        debug!("Unwrapping top-level directory {:?}", prefix);
    }

    fs::create_dir_all(into)
        .map_err(|e| HubError::io(format!("creating directory {}", into.display()), e))?;

    for (i, (name, is_dir)) in entries.iter().enumerate() {
        let relative = match prefix {
            Some(ref prefix) => name.strip_prefix(prefix).unwrap_or(name.as_path()),
            None => name.as_path(),
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        let dest = into.join(relative);

        if *is_dir {
            fs::create_dir_all(&dest)
                .map_err(|e| HubError::io(format!("creating directory {}", dest.display()), e))?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| HubError::io(format!("creating directory {}", parent.display()), e))?;
        }
        let mut entry = zip.by_index(i).map_err(|e| archive_error(archive, e))?;
        let mut out = File::create(&dest)
            .map_err(|e| HubError::io(format!("creating {}", dest.display()), e))?;
        io::copy(&mut entry, &mut out).map_err(|e| archive_error(archive, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&dest, fs::Permissions::from_mode(mode & 0o777)).map_err(
                    |e| HubError::io(format!("setting mode on {}", dest.display()), e),
                )?;
            }
        }
    }

    Ok(entries.len())
}

/// The single top-level directory every entry lives under, when it is named `name`
fn shared_root(entries: &[(PathBuf, bool)], name: &OsStr) -> Option<OsString> {
    if entries.is_empty() {
        return None;
    }
    for (path, is_dir) in entries {
        let mut components = path.components();
        match components.next() {
            Some(Component::Normal(first)) if first == name => {}
            _ => return None,
        }
        // A file sitting exactly at the root name cannot be unwrapped
        if !is_dir && components.next().is_none() {
            return None;
        }
    }
    Some(name.to_os_string())
}
