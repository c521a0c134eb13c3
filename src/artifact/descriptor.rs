//! Artifact descriptors, the registry that holds them, and per-call results

use crate::error::{HubError, HubResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of content an artifact can materialize locally
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Model weights (plain file or .zip archive)
    Model,
    /// Companion dataset (.zip archive only)
    Dataset,
    /// Source repository (git tree)
    Repo,
}

impl Category {
    /// Subtree of the cache root holding this category
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Model => "models",
            Self::Dataset => "dataset",
            Self::Repo => "repos",
        }
    }

    /// All categories in materialization order
    pub fn all() -> &'static [Self] {
        &[Self::Model, Self::Dataset, Self::Repo]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Model => "model",
            Self::Dataset => "dataset",
            Self::Repo => "repo",
        };
        write!(f, "{}", name)
    }
}

/// Registry entry describing where an artifact's content comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    /// Namespace grouping related artifacts
    pub application: String,

    /// Primary payload (model weights)
    pub url: String,

    /// Companion dataset archive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,

    /// Git repository with the model's code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

impl ArtifactDescriptor {
    /// Source URL for a category, if the descriptor declares one
    pub fn source(&self, category: Category) -> Option<&str> {
        match category {
            Category::Model => Some(self.url.as_str()),
            Category::Dataset => self.dataset.as_deref(),
            Category::Repo => self.repo.as_deref(),
        }
    }
}

/// Immutable name -> descriptor mapping
///
/// Iteration order is lexicographic by artifact name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    artifacts: BTreeMap<String, ArtifactDescriptor>,
}

impl Registry {
    /// Build a registry from a mapping
    pub fn new(artifacts: BTreeMap<String, ArtifactDescriptor>) -> Self {
        Self { artifacts }
    }

    /// Look up an artifact by name
    pub fn get(&self, name: &str) -> HubResult<&ArtifactDescriptor> {
        self.artifacts
            .get(name)
            .ok_or_else(|| HubError::ArtifactNotFound(name.to_string()))
    }

    /// Iterate artifacts in registry order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArtifactDescriptor)> {
        self.artifacts.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Return a registry where entries from `other` replace same-named ones
    pub fn merged(mut self, other: Registry) -> Self {
        self.artifacts.extend(other.artifacts);
        self
    }
}

impl FromIterator<(String, ArtifactDescriptor)> for Registry {
    fn from_iter<I: IntoIterator<Item = (String, ArtifactDescriptor)>>(iter: I) -> Self {
        Self {
            artifacts: iter.into_iter().collect(),
        }
    }
}

/// Outcome of a successful materialize call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Materialized {
    pub name: String,
    pub category: Category,
    /// Canonical local path (the expanded directory for archives)
    pub path: PathBuf,
    /// Whether content was already present and no fetch happened
    pub cached: bool,
}

impl Materialized {
    /// Directory downstream consumers should put on their module search path.
    ///
    /// Only repositories contribute code to the search path.
    pub fn search_path(&self) -> Option<&Path> {
        match self.category {
            Category::Repo => Some(&self.path),
            _ => None,
        }
    }
}

/// Category -> canonical path, filled only from confirmed materializations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedPaths {
    paths: BTreeMap<Category, PathBuf>,
}

impl ResolvedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a materialization result
    pub fn record(&mut self, materialized: &Materialized) {
        self.paths
            .insert(materialized.category, materialized.path.clone());
    }

    pub fn get(&self, category: Category) -> Option<&Path> {
        self.paths.get(&category).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &Path)> {
        self.paths.iter().map(|(c, p)| (*c, p.as_path()))
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
