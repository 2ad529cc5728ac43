//! The published episode library.

use crate::catalog::sanitize_title;
use crate::library::{LibraryConfig, LibraryError};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Flat directory of published episodes, one file per episode.
///
/// The destination path derives from the episode's full title, so checking
/// whether an episode is already published and publishing it agree on the
/// name by construction.
pub struct Library {
    config: LibraryConfig,
}

impl Library {
    pub fn new(config: LibraryConfig) -> Self {
        Self { config }
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Final path an episode publishes to.
    pub fn episode_path(&self, full_title: &str) -> PathBuf {
        self.config.dir.join(format!("{}.mp4", sanitize_title(full_title)))
    }

    pub fn is_published(&self, full_title: &str) -> bool {
        self.episode_path(full_title).exists()
    }

    /// Move a finished file into the library, preferring an atomic rename
    /// and falling back to copy-then-delete across filesystems.
    pub async fn publish(&self, source: &Path, full_title: &str) -> Result<PathBuf, LibraryError> {
        if !source.exists() {
            return Err(LibraryError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        fs::create_dir_all(&self.config.dir).await.map_err(|e| {
            LibraryError::DirectoryCreationFailed {
                path: self.config.dir.clone(),
                source: e,
            }
        })?;

        let destination = self.episode_path(full_title);
        let publish_failed = |e: std::io::Error| LibraryError::PublishFailed {
            source_path: source.to_path_buf(),
            destination: destination.clone(),
            source: e,
        };

        match try_atomic_move(source, &destination).await {
            Ok(true) => {}
            Ok(false) => {
                fs::copy(source, &destination).await.map_err(publish_failed)?;
                fs::remove_file(source).await.map_err(publish_failed)?;
            }
            Err(e) => return Err(publish_failed(e)),
        }

        info!(path = %destination.display(), "Episode published");
        Ok(destination)
    }
}

/// Attempts to move a file atomically (rename). Returns Ok(false) when the
/// move crosses filesystems and a copy is needed instead.
async fn try_atomic_move(source: &Path, destination: &Path) -> Result<bool, std::io::Error> {
    match fs::rename(source, destination).await {
        Ok(()) => Ok(true),
        Err(e) => {
            // Cross-filesystem moves fail with EXDEV (18 on Linux)
            if e.kind() == std::io::ErrorKind::CrossesDevices || e.raw_os_error() == Some(18) {
                Ok(false)
            } else {
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn library(dir: &TempDir) -> Library {
        Library::new(LibraryConfig::default().with_dir(dir.path().join("library")))
    }

    #[test]
    fn test_episode_path_sanitizes_title() {
        let dir = TempDir::new().unwrap();
        let library = library(&dir);
        let path = library.episode_path("Show: S09E07 [WEB-DL/ES]");
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("Show_ S09E07 [WEB-DL_ES].mp4")
        );
    }

    #[tokio::test]
    async fn test_publish_moves_file() {
        let dir = TempDir::new().unwrap();
        let library = library(&dir);
        let source = dir.path().join("Show S09E07_FINAL.mp4");
        fs::write(&source, b"episode bytes").await.unwrap();

        assert!(!library.is_published("Show S09E07"));
        let destination = library.publish(&source, "Show S09E07").await.unwrap();

        assert!(library.is_published("Show S09E07"));
        assert!(!source.exists());
        assert_eq!(fs::read(&destination).await.unwrap(), b"episode bytes");
    }

    #[tokio::test]
    async fn test_publish_creates_library_dir() {
        let dir = TempDir::new().unwrap();
        let library = library(&dir);
        let source = dir.path().join("done.mp4");
        fs::write(&source, b"x").await.unwrap();

        assert!(!library.dir().exists());
        library.publish(&source, "Show S09E01").await.unwrap();
        assert!(library.dir().is_dir());
    }

    #[tokio::test]
    async fn test_publish_missing_source() {
        let dir = TempDir::new().unwrap();
        let library = library(&dir);

        let err = library
            .publish(&dir.path().join("missing.mp4"), "Show S09E01")
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::SourceNotFound { .. }));
    }
}
