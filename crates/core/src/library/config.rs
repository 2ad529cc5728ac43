//! Library configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the published episode library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryConfig {
    /// Directory finished episodes are published into.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

fn default_dir() -> PathBuf {
    PathBuf::from("library")
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}

impl LibraryConfig {
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }
}
