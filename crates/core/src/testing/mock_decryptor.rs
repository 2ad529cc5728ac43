//! Mock stream decryptor for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::decryptor::{DecryptorError, StreamDecryptor};

/// A recorded decrypt call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDecrypt {
    pub input: PathBuf,
    pub output: PathBuf,
    pub key: String,
}

/// A recorded merge call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMerge {
    pub video: PathBuf,
    pub audio: PathBuf,
    pub output: PathBuf,
}

/// Mock implementation of the StreamDecryptor trait.
///
/// Writes real output files so downstream stages and cleanup assertions can
/// operate on the filesystem.
pub struct MockDecryptor {
    decrypts: Arc<RwLock<Vec<RecordedDecrypt>>>,
    merges: Arc<RwLock<Vec<RecordedMerge>>>,
    next_error: Arc<RwLock<Option<DecryptorError>>>,
}

impl Default for MockDecryptor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDecryptor {
    /// Create a new mock decryptor.
    pub fn new() -> Self {
        Self {
            decrypts: Arc::new(RwLock::new(Vec::new())),
            merges: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Configure the next decrypt or merge to fail with the given error.
    pub async fn set_next_error(&self, error: DecryptorError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all recorded decrypt calls.
    pub async fn recorded_decrypts(&self) -> Vec<RecordedDecrypt> {
        self.decrypts.read().await.clone()
    }

    /// Get all recorded merge calls.
    pub async fn recorded_merges(&self) -> Vec<RecordedMerge> {
        self.merges.read().await.clone()
    }
}

#[async_trait]
impl StreamDecryptor for MockDecryptor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn decrypt(
        &self,
        input: &Path,
        output: &Path,
        key: &str,
    ) -> Result<(), DecryptorError> {
        self.decrypts.write().await.push(RecordedDecrypt {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            key: key.to_string(),
        });

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        tokio::fs::write(output, b"decrypted stream").await?;
        Ok(())
    }

    async fn merge(
        &self,
        video: &Path,
        audio: &Path,
        output: &Path,
    ) -> Result<(), DecryptorError> {
        self.merges.write().await.push(RecordedMerge {
            video: video.to_path_buf(),
            audio: audio.to_path_buf(),
            output: output.to_path_buf(),
        });

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        tokio::fs::write(output, b"merged episode").await?;
        Ok(())
    }

    async fn validate(&self) -> Result<(), DecryptorError> {
        Ok(())
    }
}
