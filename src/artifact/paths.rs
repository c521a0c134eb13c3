//! Canonical path derivation for the local cache root
//!
//! Layout: `<root>/<category dir>/<application>/<name>/<filename>`.
//! Archive payloads resolve to the file path with its extension stripped.
//! Nothing in here touches the filesystem.

use crate::artifact::descriptor::Category;
use crate::error::{HubError, HubResult};
use std::path::{Path, PathBuf};

/// The one archive extension the cache knows how to expand
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Maps artifact coordinates onto the cache root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The cache root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<category>`
    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.dir_name())
    }

    /// `<root>/<category>/<application>/<name>`
    pub fn artifact_dir(&self, category: Category, application: &str, name: &str) -> PathBuf {
        self.category_dir(category).join(application).join(name)
    }

    /// `<root>/<category>/<application>/<name>/<filename>`
    pub fn resolve(
        &self,
        category: Category,
        application: &str,
        name: &str,
        filename: &str,
    ) -> PathBuf {
        self.artifact_dir(category, application, name).join(filename)
    }
}

/// Directory an archive expands into: the archive path minus its last extension.
///
/// `foo.zip` -> `foo`, `foo.tar.zip` -> `foo.tar`.
pub fn archive_target_dir(archive: &Path) -> PathBuf {
    archive.with_extension("")
}

/// Whether the path carries the supported archive extension
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}

/// Fail with `UnsupportedFormat` unless the path is a supported archive
pub fn require_archive(path: &Path) -> HubResult<()> {
    if is_archive(path) {
        return Ok(());
    }
    let extension = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_else(|| "no extension".to_string());
    Err(HubError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension,
    })
}

/// Last path segment of a URL with query string and fragment removed
pub fn filename_from_url(url: &str) -> HubResult<String> {
    let without_fragment = url.split('#').next().unwrap_or_default();
    let without_query = without_fragment.split('?').next().unwrap_or_default();
    // Host part of a scheme URL never names the file
    let path = match without_query.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, p)| p).unwrap_or_default(),
        None => without_query,
    };
    let name = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(HubError::InvalidUrl(url.to_string()));
    }
    Ok(name.to_string())
}
