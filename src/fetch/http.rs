//! HTTP GET over ureq

use super::{ByteStream, HttpSource};
use crate::error::{HubError, HubResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Build the shared blocking agent.
///
/// Status codes are inspected by the callers, and non-standard verbs are
/// allowed so the remote adapter can issue `MKCOL`.
pub(crate) fn build_agent(connect_timeout: Option<Duration>) -> Agent {
    let config = Agent::config_builder()
        .http_status_as_error(false)
        .allow_non_standard_methods(true)
        .timeout_connect(connect_timeout)
        .build();
    Agent::new_with_config(config)
}

/// `HttpSource` backed by a blocking ureq agent on the blocking pool
#[derive(Clone)]
pub struct UreqHttp {
    agent: Agent,
}

impl UreqHttp {
    pub fn new(connect_timeout: Option<Duration>) -> Self {
        Self {
            agent: build_agent(connect_timeout),
        }
    }
}

impl Default for UreqHttp {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl HttpSource for UreqHttp {
    async fn get(&self, url: &str) -> HubResult<ByteStream> {
        let agent = self.agent.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || {
            debug!("GET {}", url);
            let response = agent
                .get(&url)
                .call()
                .map_err(|e| HubError::transport(&url, e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(HubError::transport(&url, format!("HTTP {}", status)));
            }

            let len = response.body().content_length();
            let reader = response.into_body().into_reader();
            Ok(ByteStream::new(reader, len))
        })
        .await
        .map_err(|e| HubError::Internal(format!("HTTP task failed: {}", e)))?
    }
}
