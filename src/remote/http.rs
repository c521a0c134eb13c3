//! WebDAV-style remote over ureq: MKCOL, PUT, DELETE
//!
//! Uploads stream the file from disk; nothing is buffered whole.

use super::RemoteStore;
use crate::error::{HubError, HubResult};
use crate::fetch::build_agent;
use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use ureq::http::{Request, StatusCode};
use ureq::{Agent, SendBody};

/// `RemoteStore` speaking the directory-oriented HTTP verbs
#[derive(Clone)]
pub struct HttpRemote {
    base_url: String,
    agent: Agent,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>, connect_timeout: Option<Duration>) -> Self {
        Self {
            base_url: base_url.into(),
            agent: build_agent(connect_timeout),
        }
    }

    /// Absolute URL for a remote path
    pub fn url(&self, path: &str) -> String {
        let path = super::normalize(path);
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() {
            format!("{}/", base)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Run a blocking request on the blocking pool and map the status
    async fn send<F>(&self, verb: &'static str, url: String, request: F) -> HubResult<StatusCode>
    where
        F: FnOnce(&Agent, &str) -> Result<StatusCode, HubError> + Send + 'static,
    {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || {
            debug!("{} {}", verb, url);
            request(&agent, &url)
        })
        .await
        .map_err(|e| HubError::Internal(format!("{} task failed: {}", verb, e)))?
    }
}

fn check(url: &str, verb: &str, status: StatusCode) -> HubResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(HubError::transport(url, format!("{} returned HTTP {}", verb, status)))
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn mkdir(&self, path: &str) -> HubResult<()> {
        // Collections are addressed with a trailing slash
        let url = format!("{}/", self.url(path).trim_end_matches('/'));
        let status = self
            .send("MKCOL", url.clone(), |agent, url| {
                let request = Request::builder()
                    .method("MKCOL")
                    .uri(url)
                    .body(())
                    .map_err(|e| HubError::transport(url, e))?;
                let response = agent.run(request).map_err(|e| HubError::transport(url, e))?;
                Ok(response.status())
            })
            .await?;

        // 405 is how WebDAV servers say the collection already exists
        if status == StatusCode::METHOD_NOT_ALLOWED {
            debug!("{} already exists", url);
            return Ok(());
        }
        check(&url, "MKCOL", status)
    }

    async fn put_file(&self, path: &str, local: &Path) -> HubResult<()> {
        let url = self.url(path);
        let local: PathBuf = local.to_path_buf();
        let status = self
            .send("PUT", url.clone(), move |agent, url| {
                let mut file = File::open(&local)
                    .map_err(|e| HubError::io(format!("opening {}", local.display()), e))?;
                let len = file
                    .metadata()
                    .map_err(|e| HubError::io(format!("reading {}", local.display()), e))?
                    .len();
                // Sized body: the remote gets Content-Length, not chunked encoding
                let response = agent
                    .put(url)
                    .header("Content-Length", len.to_string())
                    .send(SendBody::from_reader(&mut file))
                    .map_err(|e| HubError::transport(url, e))?;
                Ok(response.status())
            })
            .await?;
        check(&url, "PUT", status)
    }

    async fn delete(&self, path: &str) -> HubResult<()> {
        let url = self.url(path);
        let status = self
            .send("DELETE", url.clone(), |agent, url| {
                let response = agent
                    .delete(url)
                    .call()
                    .map_err(|e| HubError::transport(url, e))?;
                Ok(response.status())
            })
            .await?;
        check(&url, "DELETE", status)
    }
}
