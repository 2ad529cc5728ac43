//! External discovery collaborator.
//!
//! Discovery (turning a catalog listing page into episode descriptors) runs
//! outside this process. The orchestrator only asks it to refresh the cache
//! file and degrades to the existing snapshot when that fails.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use super::DiscoveryError;

/// Configuration for the external discovery command.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// Argv of the refresh command; the series listing URL is appended as
    /// the final argument. Empty means refresh is unavailable.
    #[serde(default)]
    pub command: Vec<String>,

    /// Time budget for one refresh run in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

/// Refreshes the discovery cache on disk.
#[async_trait]
pub trait Discovery: Send + Sync {
    /// Human-readable backend name for logs.
    fn name(&self) -> &str;

    /// Run one refresh. On success the cache file has been rewritten by the
    /// collaborator.
    async fn refresh(&self) -> Result<(), DiscoveryError>;
}

/// Production discovery: spawns the configured command and waits for it.
pub struct CommandDiscovery {
    config: DiscoveryConfig,
    series_url: String,
}

impl CommandDiscovery {
    pub fn new(config: DiscoveryConfig, series_url: impl Into<String>) -> Self {
        Self {
            config,
            series_url: series_url.into(),
        }
    }
}

#[async_trait]
impl Discovery for CommandDiscovery {
    fn name(&self) -> &str {
        "command"
    }

    async fn refresh(&self) -> Result<(), DiscoveryError> {
        let Some((program, args)) = self.config.command.split_first() else {
            return Err(DiscoveryError::NotConfigured);
        };

        let mut cmd = Command::new(program);
        cmd.args(args);
        if !self.series_url.is_empty() {
            cmd.arg(&self.series_url);
        }
        cmd.stdin(Stdio::null());

        info!(command = %program, "Refreshing discovery cache");
        let mut child = cmd.spawn().map_err(|source| DiscoveryError::Spawn {
            command: program.clone(),
            source,
        })?;

        let status = match tokio::time::timeout(
            Duration::from_secs(self.config.timeout_secs),
            child.wait(),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(DiscoveryError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
        };

        if !status.success() {
            return Err(DiscoveryError::Failed {
                code: status.code(),
            });
        }

        debug!("Discovery refresh completed");
        Ok(())
    }
}
