//! Named artifacts and their local cache
//!
//! # Cache Layout
//!
//! | Category | Directory | Payload |
//! |----------|-----------|---------|
//! | model | `models/<app>/<name>/` | file, or `.zip` expanded to `<stem>/` |
//! | dataset | `dataset/<app>/<name>/` | `.zip` expanded to `<stem>/` |
//! | repo | `repos/<app>/<name>/` | git clone |
//!
//! The filesystem is the only record of what has been materialized.

pub mod cache;
pub mod descriptor;
pub mod paths;

pub use cache::ArtifactCache;
pub use descriptor::{ArtifactDescriptor, Category, Materialized, Registry, ResolvedPaths};
pub use paths::{archive_target_dir, PathResolver};
