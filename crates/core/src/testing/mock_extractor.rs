//! Mock manifest extractor for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::extractor::{ExtractionResult, ExtractorError, ManifestExtractor};

/// A recorded extraction call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedExtraction {
    pub episode_url: String,
    pub static_key_known: bool,
}

/// Mock implementation of the ManifestExtractor trait.
///
/// Provides controllable behavior for testing:
/// - Record every extraction call with its flags
/// - Return a configured result, or a derived default
/// - Fail the next call with an injected error
pub struct MockExtractor {
    extractions: Arc<RwLock<Vec<RecordedExtraction>>>,
    result: Arc<RwLock<Option<ExtractionResult>>>,
    page_title: Arc<RwLock<Option<String>>>,
    next_error: Arc<RwLock<Option<ExtractorError>>>,
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExtractor {
    /// Create a new mock extractor.
    pub fn new() -> Self {
        Self {
            extractions: Arc::new(RwLock::new(Vec::new())),
            result: Arc::new(RwLock::new(None)),
            page_title: Arc::new(RwLock::new(None)),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Return this exact result from every extraction.
    pub async fn set_result(&self, result: ExtractionResult) {
        *self.result.write().await = Some(result);
    }

    /// Override only the page title of the returned result.
    pub async fn set_page_title(&self, title: impl Into<String>) {
        *self.page_title.write().await = Some(title.into());
    }

    /// Configure the next extraction to fail with the given error.
    pub async fn set_next_error(&self, error: ExtractorError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all recorded extraction calls.
    pub async fn recorded_extractions(&self) -> Vec<RecordedExtraction> {
        self.extractions.read().await.clone()
    }

    /// Number of extraction calls seen so far.
    pub async fn extraction_count(&self) -> usize {
        self.extractions.read().await.len()
    }

    fn default_result(episode_url: &str) -> ExtractionResult {
        ExtractionResult {
            manifest_url: format!("https://dash.mediaset.example/{}.mpd", episode_url.len()),
            cookies: "session=mock".to_string(),
            user_agent: "MockAgent/1.0".to_string(),
            referer: "https://www.mediasetinfinity.es/".to_string(),
            page_title: String::new(),
        }
    }
}

#[async_trait]
impl ManifestExtractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(
        &self,
        episode_url: &str,
        static_key_known: bool,
    ) -> Result<ExtractionResult, ExtractorError> {
        self.extractions.write().await.push(RecordedExtraction {
            episode_url: episode_url.to_string(),
            static_key_known,
        });

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let mut result = self
            .result
            .read()
            .await
            .clone()
            .unwrap_or_else(|| Self::default_result(episode_url));
        if let Some(title) = self.page_title.read().await.as_ref() {
            result.page_title = title.clone();
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls() {
        let extractor = MockExtractor::new();
        extractor.extract("https://e.example/1", true).await.unwrap();
        extractor.extract("https://e.example/2", false).await.unwrap();

        let recorded = extractor.recorded_extractions().await;
        assert_eq!(recorded.len(), 2);
        assert!(recorded[0].static_key_known);
        assert_eq!(recorded[1].episode_url, "https://e.example/2");
    }

    #[tokio::test]
    async fn test_page_title_override() {
        let extractor = MockExtractor::new();
        extractor.set_page_title("Programa 7").await;

        let result = extractor.extract("https://e.example/7", false).await.unwrap();
        assert_eq!(result.page_title, "Programa 7");
    }

    #[tokio::test]
    async fn test_error_injection_is_consumed() {
        let extractor = MockExtractor::new();
        extractor
            .set_next_error(ExtractorError::ExtractionTimeout { timeout_secs: 600 })
            .await;

        assert!(extractor.extract("https://e.example/7", false).await.is_err());
        assert!(extractor.extract("https://e.example/7", false).await.is_ok());
    }
}
