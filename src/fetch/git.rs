//! git clone through the git CLI

use super::{GitSource, Progress};
use crate::error::{HubError, HubResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

/// Max number of stderr lines kept for clone error messages.
const ERROR_TAIL_LINES: usize = 20;

/// `GitSource` that shells out to `git clone`
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
        }
    }

    /// Use a specific git executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

/// Arguments for `git clone`; the URL always follows `--`
fn clone_args(url: &str, dest: &Path) -> Vec<OsString> {
    vec![
        "clone".into(),
        "--progress".into(),
        "--".into(),
        url.into(),
        dest.as_os_str().to_os_string(),
    ]
}

#[async_trait]
impl GitSource for GitCli {
    async fn clone_repo(&self, url: &str, dest: &Path, progress: &dyn Progress) -> HubResult<()> {
        debug!("Executing: {} clone --progress -- {} {}", self.program, url, dest.display());

        let mut child = Command::new(&self.program)
            .args(clone_args(url, dest))
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| HubError::command_failed(format!("git clone {}", url), e))?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| HubError::Internal("git stderr not captured".to_string()))?;

        // git rewrites progress lines in place with '\r'
        let mut reader = BufReader::new(stderr).split(b'\r');
        let mut tail: VecDeque<String> = VecDeque::with_capacity(ERROR_TAIL_LINES);
        while let Some(chunk) = reader
            .next_segment()
            .await
            .map_err(|e| HubError::io("reading git output", e))?
        {
            for line in String::from_utf8_lossy(&chunk).lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                progress.message(line);
                if tail.len() == ERROR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line.to_string());
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| HubError::command_failed(format!("git clone {}", url), e))?;

        if status.success() {
            Ok(())
        } else {
            let output: Vec<String> = tail.into_iter().collect();
            Err(HubError::transport(
                url,
                format!("git clone exited with {}: {}", status, output.join("\n")),
            ))
        }
    }
}
