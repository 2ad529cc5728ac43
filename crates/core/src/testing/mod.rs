//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of all external collaborator
//! traits, allowing full batch runs without a browser, download tool,
//! ffmpeg or a human at the prompt.
//!
//! # Example
//!
//! ```rust,ignore
//! use tentador_core::testing::{MockDiscovery, MockExtractor, MockFetcher};
//!
//! let discovery = MockDiscovery::new();
//! let extractor = MockExtractor::new();
//! let fetcher = MockFetcher::new();
//!
//! // Configure mock behavior
//! discovery.set_failures(1).await;
//! extractor.set_page_title("Programa 7").await;
//!
//! // Wire into the orchestrator...
//! ```

mod mock_decryptor;
mod mock_discovery;
mod mock_extractor;
mod mock_fetcher;
mod mock_prompt;

pub use mock_decryptor::{MockDecryptor, RecordedDecrypt, RecordedMerge};
pub use mock_discovery::MockDiscovery;
pub use mock_extractor::{MockExtractor, RecordedExtraction};
pub use mock_fetcher::MockFetcher;
pub use mock_prompt::MockOperatorPrompt;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{build_full_title, EpisodeDescriptor};
    use crate::config::SeriesConfig;
    use crate::extractor::ExtractionResult;

    /// Create a test episode descriptor for the default series.
    pub fn episode(title: &str, season: u32, number: u32) -> EpisodeDescriptor {
        let series = SeriesConfig {
            season,
            ..SeriesConfig::default()
        };
        EpisodeDescriptor {
            title: title.to_string(),
            url: format!("https://www.mediasetinfinity.es/programa/episodio-{}", number),
            season,
            episode: number,
            full_title: build_full_title(&series, number),
        }
    }

    /// Create a test extraction result pointing at the given manifest.
    pub fn extraction_result(manifest_url: &str) -> ExtractionResult {
        ExtractionResult {
            manifest_url: manifest_url.to_string(),
            cookies: "session=fixture".to_string(),
            user_agent: "FixtureAgent/1.0".to_string(),
            referer: "https://www.mediasetinfinity.es/".to_string(),
            page_title: String::new(),
        }
    }

    /// A well-formed credential line: 32 hex chars of key id, a colon, and
    /// 32 hex chars of key, both derived from the seed.
    pub fn credential_line(seed: u8) -> String {
        format!("{:032x}:{:032x}", seed as u128, seed as u128 + 0xa0)
    }
}
