//! Single-shot fetches of HTTP payloads and git trees
//!
//! The engine does no existence checks of its own for HTTP payloads: a
//! second `fetch` to the same destination downloads again and replaces
//! the file. Callers gate on the canonical path first. Git fetches are
//! the exception and skip entirely when the destination exists.
//!
//! Transports sit behind the `HttpSource` and `GitSource` traits so the
//! engine can be driven by ureq/git in production and by fakes in tests.

mod git;
mod http;

pub use git::GitCli;
pub use http::UreqHttp;
pub(crate) use http::build_agent;

use crate::error::{HubError, HubResult};
use crate::staging;
use async_trait::async_trait;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

const CHUNK_SIZE: usize = 32 * 1024;

/// Observer for long-running transfers. Every method is optional.
pub trait Progress: Send + Sync {
    /// A transfer started; `total` is the byte length when known
    fn start(&self, _label: &str, _total: Option<u64>) {}

    /// Cumulative bytes transferred so far
    fn advance(&self, _done: u64) {}

    /// Free-form status line (git progress output)
    fn message(&self, _line: &str) {}

    /// The transfer ended, successfully or not
    fn finish(&self) {}
}

/// Progress sink that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Progress for Silent {}

/// A response body ready to be streamed
pub struct ByteStream {
    pub reader: Box<dyn Read + Send>,
    /// Content length advertised by the server
    pub len: Option<u64>,
}

impl ByteStream {
    pub fn new(reader: impl Read + Send + 'static, len: Option<u64>) -> Self {
        Self {
            reader: Box::new(reader),
            len,
        }
    }
}

/// HTTP GET capability
#[async_trait]
pub trait HttpSource: Send + Sync {
    /// Open `url` for streaming. Non-success statuses are transport failures.
    async fn get(&self, url: &str) -> HubResult<ByteStream>;
}

/// Git clone capability
#[async_trait]
pub trait GitSource: Send + Sync {
    /// Clone `url` into `dest`, which must not exist yet
    async fn clone_repo(&self, url: &str, dest: &Path, progress: &dyn Progress) -> HubResult<()>;
}

/// Fetches payloads and repositories to caller-chosen paths
#[derive(Clone)]
pub struct FetchEngine {
    http: Arc<dyn HttpSource>,
    git: Arc<dyn GitSource>,
    progress: Arc<dyn Progress>,
}

impl FetchEngine {
    /// Create an engine with silent progress
    pub fn new(http: Arc<dyn HttpSource>, git: Arc<dyn GitSource>) -> Self {
        Self {
            http,
            git,
            progress: Arc::new(Silent),
        }
    }

    /// Report transfers to `progress`
    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    /// Download `url` to `dest`, creating parent directories.
    ///
    /// The body is streamed into a hidden sibling file and renamed over
    /// `dest` once complete, so an interrupted download never leaves a file
    /// at `dest`.
    /// Returns the number of bytes written.
    pub async fn fetch(&self, url: &str, dest: &Path) -> HubResult<u64> {
        staging::ensure_parent(dest).await?;

        info!("Downloading {} -> {}", url, dest.display());
        let body = self.http.get(url).await?;

        let label = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.to_string());
        self.progress.start(&label, body.len);

        let part = staging::staging_sibling(dest, "part");
        let result = stream_to_file(body, part.clone(), url.to_string(), self.progress.clone()).await;
        self.progress.finish();

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                staging::discard_file(&part).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&part, dest).await {
            staging::discard_file(&part).await;
            return Err(HubError::io(
                format!("moving download into place at {}", dest.display()),
                e,
            ));
        }

        debug!("Downloaded {} bytes to {}", bytes, dest.display());
        Ok(bytes)
    }

    /// Clone `url` into `dest` unless `dest` already exists.
    ///
    /// Returns `true` when a clone was performed. The clone lands in a
    /// staging directory first and is renamed into place on success.
    pub async fn fetch_repo(&self, url: &str, dest: &Path) -> HubResult<bool> {
        if staging::exists(dest).await? {
            debug!("Repository already present at {}", dest.display());
            return Ok(false);
        }

        staging::ensure_parent(dest).await?;
        let staging_dir = staging::staging_sibling(dest, "clone");

        info!("git clone {} -> {}", url, dest.display());
        self.progress.start(url, None);
        let result = self
            .git
            .clone_repo(url, &staging_dir, self.progress.as_ref())
            .await;
        self.progress.finish();

        if let Err(e) = result {
            staging::discard_dir(&staging_dir).await;
            return Err(e);
        }

        staging::publish_dir(&staging_dir, dest).await
    }
}

/// Copy the body into `part` chunk by chunk on the blocking pool
async fn stream_to_file(
    body: ByteStream,
    part: PathBuf,
    url: String,
    progress: Arc<dyn Progress>,
) -> HubResult<u64> {
    tokio::task::spawn_blocking(move || {
        let ByteStream { mut reader, len } = body;
        let mut file = std::fs::File::create(&part)
            .map_err(|e| HubError::io(format!("creating {}", part.display()), e))?;

        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut done = 0u64;
        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HubError::transport(&url, e)),
            };
            file.write_all(&buffer[..read])
                .map_err(|e| HubError::io(format!("writing {}", part.display()), e))?;
            done += read as u64;
            progress.advance(done);
        }

        if let Some(expected) = len {
            if done != expected {
                return Err(HubError::transport(
                    &url,
                    format!("body truncated: expected {} bytes, got {}", expected, done),
                ));
            }
        }

        file.sync_all()
            .map_err(|e| HubError::io(format!("flushing {}", part.display()), e))?;
        Ok(done)
    })
    .await
    .map_err(|e| HubError::Internal(format!("download task failed: {}", e)))?
}
