//! Pipeline types.

use crate::decryptor::DecryptorError;
use crate::fetcher::FetcherError;
use std::path::PathBuf;
use thiserror::Error;

/// Where a finished episode ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Final location of the merged episode.
    pub final_path: PathBuf,
    /// True when the episode made it into the library; false when
    /// publication failed and the file stayed in the work directory.
    pub published: bool,
}

/// Errors from the per-episode pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fetch stage failed, including missing artifacts after a clean exit.
    #[error("Fetch stage failed: {0}")]
    Fetch(#[from] FetcherError),

    /// Decrypt or merge stage failed.
    #[error("Decrypt stage failed: {0}")]
    Decrypt(#[from] DecryptorError),

    /// The scratch directory could not be prepared.
    #[error("Failed to prepare work directory {path}: {source}")]
    WorkDir {
        path: PathBuf,
        source: std::io::Error,
    },
}
