//! Decryptor configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the ffmpeg-based decrypt and merge stages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecryptorConfig {
    /// Path to the ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// FFmpeg log level. Streams are copied, not transcoded, so anything
    /// ffmpeg prints at this level is a real problem.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Timeout for a single decrypt or merge run.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_log_level() -> String {
    "error".to_string()
}

fn default_timeout_secs() -> u64 {
    900
}

impl Default for DecryptorConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            log_level: default_log_level(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DecryptorConfig {
    pub fn with_ffmpeg_path(mut self, ffmpeg_path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = ffmpeg_path.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
