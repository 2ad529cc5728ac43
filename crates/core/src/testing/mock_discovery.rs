//! Mock discovery for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{Discovery, DiscoveryError, EpisodeDescriptor};

/// Mock implementation of the Discovery trait.
///
/// Provides controllable behavior for testing:
/// - Count refresh attempts for retry assertions
/// - Fail a configured number of leading attempts
/// - Write a cache file on successful refresh, like the real tool does
#[derive(Default)]
pub struct MockDiscovery {
    refreshes: Arc<RwLock<usize>>,
    failures_remaining: Arc<RwLock<usize>>,
    write_on_refresh: Arc<RwLock<Option<(PathBuf, Vec<EpisodeDescriptor>)>>>,
}

impl MockDiscovery {
    /// Create a new mock discovery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` refresh calls fail.
    pub async fn set_failures(&self, count: usize) {
        *self.failures_remaining.write().await = count;
    }

    /// On successful refresh, write these episodes to the given cache path.
    pub async fn write_episodes_on_refresh(&self, path: PathBuf, episodes: Vec<EpisodeDescriptor>) {
        *self.write_on_refresh.write().await = Some((path, episodes));
    }

    /// Number of refresh calls seen so far.
    pub async fn refresh_count(&self) -> usize {
        *self.refreshes.read().await
    }
}

#[async_trait]
impl Discovery for MockDiscovery {
    fn name(&self) -> &str {
        "mock"
    }

    async fn refresh(&self) -> Result<(), DiscoveryError> {
        *self.refreshes.write().await += 1;

        let mut failures = self.failures_remaining.write().await;
        if *failures > 0 {
            *failures -= 1;
            return Err(DiscoveryError::Failed { code: Some(1) });
        }
        drop(failures);

        if let Some((path, episodes)) = self.write_on_refresh.read().await.as_ref() {
            let json = serde_json::to_string_pretty(episodes)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            tokio::fs::write(path, json).await?;
        }
        Ok(())
    }
}
