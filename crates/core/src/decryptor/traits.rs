//! Trait definitions for the decryptor module.

use async_trait::async_trait;
use std::path::Path;

use super::error::DecryptorError;

/// Strips DRM from fetched streams and merges them into one container.
#[async_trait]
pub trait StreamDecryptor: Send + Sync {
    /// Returns the name of this decryptor implementation.
    fn name(&self) -> &str;

    /// Decrypts one stream in place of a transcode: the content key is
    /// applied and the stream is copied bit for bit. `key` is the raw
    /// content key in hex, without the key-id prefix.
    async fn decrypt(
        &self,
        input: &Path,
        output: &Path,
        key: &str,
    ) -> Result<(), DecryptorError>;

    /// Merges a decrypted video and audio stream into a single container,
    /// stream-copied.
    async fn merge(
        &self,
        video: &Path,
        audio: &Path,
        output: &Path,
    ) -> Result<(), DecryptorError>;

    /// Validates that the underlying tool is available.
    async fn validate(&self) -> Result<(), DecryptorError>;
}
