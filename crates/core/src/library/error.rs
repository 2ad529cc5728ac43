//! Error types for the library module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from publishing into the library.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The finished file to publish does not exist.
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// The library directory could not be created.
    #[error("Failed to create library directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The move into the library failed.
    #[error("Failed to publish {source_path} to {destination}")]
    PublishFailed {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
