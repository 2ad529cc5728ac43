//! Error types for manifest extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Errors for the extraction protocol and its subprocess boundary.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// The browser could not be started.
    #[error("Failed to launch browser session: {0}")]
    Launch(String),

    /// Navigation to the episode page failed.
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// The browser session went away (window closed, process died) before a
    /// manifest was observed.
    #[error("Browser session closed before a manifest was observed")]
    SessionClosed,

    /// The detection loop ran out of time.
    #[error("No manifest observed within {timeout_secs}s")]
    ExtractionTimeout { timeout_secs: u64 },

    /// The extractor binary is not installed at the configured path.
    #[error("Extractor binary not found at {path}")]
    ExtractorNotFound { path: PathBuf },

    /// The extractor subprocess exited with a failure status.
    #[error("Extractor subprocess failed with exit code {code:?}")]
    SubprocessFailed { code: Option<i32> },

    /// The extractor subprocess outlived the parent-side guard.
    #[error("Extractor subprocess timed out after {timeout_secs}s")]
    SubprocessTimeout { timeout_secs: u64 },

    /// Subprocess output contained no parsable result object.
    #[error("No parsable result in extractor output: {excerpt}")]
    ResultParse { excerpt: String },

    /// I/O failure talking to the subprocess.
    #[error("Extractor I/O error: {0}")]
    Io(#[from] std::io::Error),
}
