//! Fetcher abstraction.

use crate::fetcher::{FetchRequest, FetcherError};
use async_trait::async_trait;

/// Downloads the streams a manifest describes.
#[async_trait]
pub trait StreamFetcher: Send + Sync {
    fn name(&self) -> &str;

    /// Run one download job to completion. Success means the tool exited
    /// cleanly, not that the expected artifacts exist; callers locate the
    /// artifacts afterwards.
    async fn fetch(&self, request: &FetchRequest) -> Result<(), FetcherError>;
}
