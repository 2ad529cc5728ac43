//! Mock stream fetcher for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::fetcher::{FetchRequest, FetcherError, StreamFetcher};

/// Mock implementation of the StreamFetcher trait.
///
/// On success it creates the artifact files a real fetch would leave in the
/// save directory, so artifact location and the later pipeline stages can
/// run against real paths.
pub struct MockFetcher {
    fetches: Arc<RwLock<Vec<FetchRequest>>>,
    create_video: Arc<RwLock<bool>>,
    create_audio: Arc<RwLock<bool>>,
    next_error: Arc<RwLock<Option<FetcherError>>>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self {
            fetches: Arc::new(RwLock::new(Vec::new())),
            create_video: Arc::new(RwLock::new(true)),
            create_audio: Arc::new(RwLock::new(true)),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Control whether a video artifact is written on success.
    pub async fn set_create_video(&self, create: bool) {
        *self.create_video.write().await = create;
    }

    /// Control whether an audio artifact is written on success.
    pub async fn set_create_audio(&self, create: bool) {
        *self.create_audio.write().await = create;
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: FetcherError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all recorded fetch requests.
    pub async fn recorded_fetches(&self) -> Vec<FetchRequest> {
        self.fetches.read().await.clone()
    }

    /// Number of fetch calls seen so far.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }
}

#[async_trait]
impl StreamFetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<(), FetcherError> {
        self.fetches.write().await.push(request.clone());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        tokio::fs::create_dir_all(&request.save_dir).await?;
        if *self.create_video.read().await {
            let video = request.save_dir.join(format!("{}.mp4", request.save_name));
            tokio::fs::write(&video, b"encrypted video").await?;
        }
        if *self.create_audio.read().await {
            let audio = request.save_dir.join(format!("{}.m4a", request.save_name));
            tokio::fs::write(&audio, b"encrypted audio").await?;
        }
        Ok(())
    }
}
