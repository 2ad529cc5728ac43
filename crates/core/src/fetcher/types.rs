//! Fetcher types.

use std::path::PathBuf;
use thiserror::Error;

/// One stream download job handed to the fetch tool.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// Manifest URL captured during extraction.
    pub manifest_url: String,

    /// Base name the tool applies to everything it writes.
    pub save_name: String,

    /// Directory the tool writes into.
    pub save_dir: PathBuf,

    /// Raw session cookies; sanitized at the argv boundary.
    pub cookies: String,

    /// Referer header value.
    pub referer: String,

    /// User agent header value.
    pub user_agent: String,
}

/// The separated streams a successful fetch leaves on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamArtifacts {
    pub video: PathBuf,
    pub audio: PathBuf,
}

/// Errors from the fetch stage.
#[derive(Debug, Error)]
pub enum FetcherError {
    /// The fetch tool is not installed at the configured path.
    #[error("Fetch tool not found: {path}")]
    ToolNotFound { path: String },

    /// The fetch tool exited with a failure status.
    #[error("Fetch tool failed with exit code {code:?}")]
    FetchFailed { code: Option<i32> },

    /// The tool exited successfully but the expected streams are missing.
    #[error("Downloaded streams for '{save_name}' not found in {dir}")]
    ArtifactsNotFound { save_name: String, dir: PathBuf },

    /// I/O failure around the fetch.
    #[error("Fetcher I/O error: {0}")]
    Io(#[from] std::io::Error),
}
