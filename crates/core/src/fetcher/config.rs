//! Fetcher configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the external segment-fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetcherConfig {
    /// Binary invoked to download manifest streams.
    #[serde(default = "default_downloader_path")]
    pub downloader_path: String,

    /// Extra arguments appended after the built-in ones.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_downloader_path() -> String {
    "N_m3u8DL-RE".to_string()
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            downloader_path: default_downloader_path(),
            extra_args: Vec::new(),
        }
    }
}

impl FetcherConfig {
    pub fn with_downloader_path(mut self, downloader_path: impl Into<String>) -> Self {
        self.downloader_path = downloader_path.into();
        self
    }
}
