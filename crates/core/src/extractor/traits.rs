//! Extractor abstraction.

use crate::extractor::{ExtractionResult, ExtractorError};
use async_trait::async_trait;

/// Drives one manifest extraction per episode page.
///
/// `static_key_known` only annotates the session for whoever is watching it;
/// the observation protocol itself is identical either way.
#[async_trait]
pub trait ManifestExtractor: Send + Sync {
    fn name(&self) -> &str;

    async fn extract(
        &self,
        episode_url: &str,
        static_key_known: bool,
    ) -> Result<ExtractionResult, ExtractorError>;
}
