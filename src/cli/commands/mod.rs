//! CLI command implementations

pub mod completions;
pub mod config;
pub mod evict;
pub mod fetch;
pub mod list;
pub mod push;
pub mod registry;
pub mod remote;

pub use completions::execute as completions;
pub use config::execute as config;
pub use evict::execute as evict;
pub use fetch::execute as fetch;
pub use list::execute as list;
pub use push::execute as push;
pub use registry::execute as registry;
pub use remote::execute as remote_rm;

use crate::artifact::ArtifactCache;
use crate::config::Config;
use crate::error::{HubError, HubResult};
use crate::fetch::{FetchEngine, GitCli, Progress, UreqHttp};
use crate::remote::{HttpRemote, RemoteSync};
use std::sync::Arc;

/// Cache wired to the real transports
pub(crate) fn artifact_cache(config: &Config, progress: Arc<dyn Progress>) -> ArtifactCache {
    let http = UreqHttp::new(config.remote.connect_timeout());
    let fetcher =
        FetchEngine::new(Arc::new(http), Arc::new(GitCli::new())).with_progress(progress);
    ArtifactCache::new(config.storage.root(), config.artifacts.clone(), fetcher)
}

/// Remote sync against the configured archive
pub(crate) fn remote_sync(config: &Config) -> HubResult<RemoteSync> {
    let base_url = config
        .remote
        .base_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or(HubError::RemoteNotConfigured)?;
    let store = HttpRemote::new(base_url, config.remote.connect_timeout());
    Ok(RemoteSync::new(Arc::new(store)))
}
