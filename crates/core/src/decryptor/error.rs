//! Error types for the decryptor module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the decrypt and merge stages.
#[derive(Debug, Error)]
pub enum DecryptorError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// Input stream file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Decrypt run failed.
    #[error("Decryption failed: {reason}")]
    DecryptFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Merge run failed.
    #[error("Merge failed: {reason}")]
    MergeFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// The ffmpeg run timed out.
    #[error("FFmpeg timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error around the run.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecryptorError {
    pub fn decrypt_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::DecryptFailed {
            reason: reason.into(),
            stderr,
        }
    }

    pub fn merge_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
            stderr,
        }
    }
}
