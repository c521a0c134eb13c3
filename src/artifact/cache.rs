//! The artifact cache: materialize, list and evict
//!
//! Per (artifact, category) the flow is resolve path -> existence check ->
//! fetch -> expand (archives only). The canonical path is the existence
//! key, so a present artifact is never fetched, expanded or verified again.

use crate::archive::ArchiveExpander;
use crate::artifact::descriptor::{Category, Materialized, Registry, ResolvedPaths};
use crate::artifact::paths::{
    archive_target_dir, filename_from_url, is_archive, require_archive, PathResolver,
};
use crate::error::{HubError, HubResult};
use crate::fetch::FetchEngine;
use crate::staging;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Orchestrates path resolution, fetching and expansion for a registry
pub struct ArtifactCache {
    resolver: PathResolver,
    registry: Registry,
    fetcher: FetchEngine,
    expander: ArchiveExpander,
}

impl ArtifactCache {
    pub fn new(root: impl Into<PathBuf>, registry: Registry, fetcher: FetchEngine) -> Self {
        Self {
            resolver: PathResolver::new(root),
            registry,
            fetcher,
            expander: ArchiveExpander::new(),
        }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Ensure the model payload is present, expanding `.zip` payloads
    pub async fn materialize_model(&self, name: &str) -> HubResult<Materialized> {
        self.materialize_payload(name, Category::Model).await
    }

    /// Ensure the dataset archive is present and expanded.
    ///
    /// Only `.zip` datasets are supported; anything else fails before any I/O.
    pub async fn materialize_dataset(&self, name: &str) -> HubResult<Materialized> {
        self.materialize_payload(name, Category::Dataset).await
    }

    /// Ensure the source repository is cloned
    pub async fn materialize_repo(&self, name: &str) -> HubResult<Materialized> {
        let descriptor = self.registry.get(name)?;
        let url = descriptor
            .source(Category::Repo)
            .ok_or_else(|| HubError::SourceNotConfigured {
                name: name.to_string(),
                category: Category::Repo,
            })?;

        let dest = self.resolver.resolve(
            Category::Repo,
            &descriptor.application,
            name,
            &filename_from_url(url)?,
        );

        let cloned = self.fetcher.fetch_repo(url, &dest).await?;
        Ok(Materialized {
            name: name.to_string(),
            category: Category::Repo,
            path: dest,
            cached: !cloned,
        })
    }

    /// Materialize one category
    pub async fn materialize(&self, name: &str, category: Category) -> HubResult<Materialized> {
        match category {
            Category::Model => self.materialize_model(name).await,
            Category::Dataset => self.materialize_dataset(name).await,
            Category::Repo => self.materialize_repo(name).await,
        }
    }

    /// Materialize the model plus whatever dataset and repo the artifact declares
    pub async fn materialize_all(&self, name: &str) -> HubResult<ResolvedPaths> {
        let descriptor = self.registry.get(name)?;
        let mut resolved = ResolvedPaths::new();

        for category in Category::all() {
            if descriptor.source(*category).is_none() {
                continue;
            }
            let materialized = self.materialize(name, *category).await?;
            resolved.record(&materialized);
        }

        Ok(resolved)
    }

    async fn materialize_payload(&self, name: &str, category: Category) -> HubResult<Materialized> {
        let descriptor = self.registry.get(name)?;
        let url = descriptor
            .source(category)
            .ok_or_else(|| HubError::SourceNotConfigured {
                name: name.to_string(),
                category,
            })?;

        let download = self.resolver.resolve(
            category,
            &descriptor.application,
            name,
            &filename_from_url(url)?,
        );

        if category == Category::Dataset {
            require_archive(&download)?;
        }
        let archive = is_archive(&download);
        let canonical = if archive {
            archive_target_dir(&download)
        } else {
            download.clone()
        };

        if staging::exists(&canonical).await? {
            debug!("Cache hit for {} {}: {}", category, name, canonical.display());
            if archive {
                remove_stale_archive(&download).await?;
            }
            return Ok(Materialized {
                name: name.to_string(),
                category,
                path: canonical,
                cached: true,
            });
        }

        self.fetcher.fetch(url, &download).await?;
        let path = if archive {
            self.expander.expand(&download, &canonical).await?
        } else {
            download
        };

        info!("Materialized {} {} at {}", category, name, path.display());
        Ok(Materialized {
            name: name.to_string(),
            category,
            path,
            cached: false,
        })
    }

    /// Entry names under every present `<category>/<application>/<name>` directory.
    ///
    /// Ordered by registry order, then directory listing order. Artifacts
    /// with nothing on disk contribute nothing.
    pub async fn list(&self, category: Category) -> HubResult<Vec<String>> {
        let mut names = Vec::new();

        for (name, descriptor) in self.registry.iter() {
            let dir = self
                .resolver
                .artifact_dir(category, &descriptor.application, name);
            if !staging::exists(&dir).await? {
                continue;
            }

            let mut entries = fs::read_dir(&dir)
                .await
                .map_err(|e| HubError::io(format!("listing {}", dir.display()), e))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| HubError::io(format!("listing {}", dir.display()), e))?
            {
                let entry_name = entry.file_name().to_string_lossy().into_owned();
                if staging::is_staging_name(&entry_name) {
                    continue;
                }
                names.push(entry_name);
            }
        }

        Ok(names)
    }

    /// Remove the whole category subtree. Returns whether anything was removed.
    pub async fn evict(&self, category: Category) -> HubResult<bool> {
        let dir = self.resolver.category_dir(category);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                info!("Evicted {}", dir.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Nothing to evict at {}", dir.display());
                Ok(false)
            }
            Err(e) => Err(HubError::io(format!("removing {}", dir.display()), e)),
        }
    }
}

/// Drop an archive left beside its expanded directory by an interrupted run
async fn remove_stale_archive(download: &Path) -> HubResult<()> {
    match fs::remove_file(download).await {
        Ok(()) => {
            info!("Removed leftover archive {}", download.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(HubError::io(
            format!("removing archive {}", download.display()),
            e,
        )),
    }
}
