//! Reader for the discovery cache snapshot.

use std::path::{Path, PathBuf};

use super::{CatalogError, EpisodeDescriptor};

/// The JSON snapshot of discovered episodes, written by the discovery
/// collaborator and only ever read here. Episodes arrive presorted by
/// descending episode number.
pub struct DiscoveryCache {
    path: PathBuf,
}

impl DiscoveryCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a snapshot exists on disk.
    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Load all episode descriptors from the snapshot.
    pub async fn load(&self) -> Result<Vec<EpisodeDescriptor>, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    CatalogError::CacheMissing {
                        path: self.path.clone(),
                    }
                } else {
                    CatalogError::CacheRead {
                        path: self.path.clone(),
                        source,
                    }
                }
            })?;

        serde_json::from_str(&raw).map_err(|source| CatalogError::CacheParse {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_valid_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("monitor_results.json");
        tokio::fs::write(
            &path,
            r#"[
                {"title":"Programa 9","url":"https://e.es/9","season":9,"episode":9,"fullTitle":"Serie S09E09 [WEB-DL 1080p ES]"},
                {"title":"Programa 8","url":"https://e.es/8","season":9,"episode":8,"fullTitle":"Serie S09E08 [WEB-DL 1080p ES]"}
            ]"#,
        )
        .await
        .unwrap();

        let cache = DiscoveryCache::new(&path);
        assert!(cache.exists().await);
        let episodes = cache.load().await.unwrap();
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].episode, 9);
        assert_eq!(episodes[1].episode, 8);
    }

    #[tokio::test]
    async fn test_load_missing_cache() {
        let dir = TempDir::new().unwrap();
        let cache = DiscoveryCache::new(dir.path().join("absent.json"));
        assert!(!cache.exists().await);
        let err = cache.load().await.unwrap_err();
        assert!(matches!(err, CatalogError::CacheMissing { .. }));
    }

    #[tokio::test]
    async fn test_load_malformed_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("monitor_results.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let cache = DiscoveryCache::new(&path);
        let err = cache.load().await.unwrap_err();
        assert!(matches!(err, CatalogError::CacheParse { .. }));
    }
}
