//! Credential store file access.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{Credential, DuplicateCredential, KeyStoreError};

/// Minimum line length for the lenient candidate gate. Shorter lines are
/// treated as placeholders, not credentials.
const MIN_CANDIDATE_LEN: usize = 11;

/// Line-oriented credential store: line N (1-indexed, blank lines counted)
/// holds the credential for episode N.
///
/// The file is reread on every access so a manual edit made while the batch
/// is waiting is always observed. Nothing locks the file; an edit racing a
/// read elsewhere is an accepted limitation of the manual-capture flow.
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// All store lines, in file order, or `None` when the file is missing.
    async fn read_lines(&self) -> Result<Option<Vec<String>>, KeyStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content.split('\n').map(str::to_string).collect())),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(KeyStoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Trimmed content of the line for this episode (1-indexed). `None`
    /// when the file is missing or the line is out of range.
    pub async fn line_for_episode(&self, episode: u32) -> Result<Option<String>, KeyStoreError> {
        if episode == 0 {
            return Ok(None);
        }
        let Some(lines) = self.read_lines().await? else {
            return Ok(None);
        };
        Ok(lines
            .get(episode as usize - 1)
            .map(|line| line.trim().to_string()))
    }

    /// Candidate credential for this episode, per the lenient gate: line
    /// present, non-trivial length, and containing the field separator.
    /// Strict format validation is left to the caller and never blocks.
    pub async fn credential_for_episode(
        &self,
        episode: u32,
    ) -> Result<Option<Credential>, KeyStoreError> {
        let Some(line) = self.line_for_episode(episode).await? else {
            return Ok(None);
        };
        if line.len() >= MIN_CANDIDATE_LEN && line.contains(':') {
            Ok(Some(Credential::new(line)))
        } else {
            Ok(None)
        }
    }

    /// Scan the whole store for repeated credential values. Blank lines and
    /// lines without a separator are ignored. Reported once per later
    /// occurrence with 1-based line numbers.
    pub async fn detect_duplicates(&self) -> Result<Vec<DuplicateCredential>, KeyStoreError> {
        let Some(lines) = self.read_lines().await? else {
            return Ok(Vec::new());
        };

        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for (idx, line) in lines.iter().enumerate() {
            let value = line.trim();
            if value.is_empty() || !value.contains(':') {
                continue;
            }
            match seen.get(value) {
                Some(&first_line) => duplicates.push(DuplicateCredential {
                    line: idx + 1,
                    first_line,
                    value: value.to_string(),
                }),
                None => {
                    seen.insert(value.to_string(), idx + 1);
                }
            }
        }
        Ok(duplicates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VALID: &str = "00112233445566778899aabbccddeeff:ffeeddccbbaa99887766554433221100";

    async fn store_with(content: &str) -> (TempDir, KeyStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keys.txt");
        tokio::fs::write(&path, content).await.unwrap();
        (dir, KeyStore::new(path))
    }

    #[tokio::test]
    async fn test_lookup_is_one_indexed_with_blank_lines() {
        let (_dir, store) = store_with(&format!("\n{VALID}\n")).await;

        assert_eq!(store.credential_for_episode(1).await.unwrap(), None);
        let cred = store.credential_for_episode(2).await.unwrap().unwrap();
        assert_eq!(cred.raw(), VALID);
        assert_eq!(store.credential_for_episode(3).await.unwrap(), None);
        assert_eq!(store.credential_for_episode(4).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_lookup_episode_zero_yields_nothing() {
        let (_dir, store) = store_with(VALID).await;
        assert_eq!(store.credential_for_episode(0).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_file_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let store = KeyStore::new(dir.path().join("keys.txt"));
        assert!(!store.exists().await);
        assert_eq!(store.credential_for_episode(1).await.unwrap(), None);
        assert!(store.detect_duplicates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_candidate_gate_rejects_short_or_separatorless_lines() {
        let (_dir, store) = store_with("short:1\nnoseparatorbutlongenough\n").await;
        assert_eq!(store.credential_for_episode(1).await.unwrap(), None);
        assert_eq!(store.credential_for_episode(2).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_lines_are_trimmed_before_the_gate() {
        let (_dir, store) = store_with(&format!("  {VALID}  \n")).await;
        let cred = store.credential_for_episode(1).await.unwrap().unwrap();
        assert_eq!(cred.raw(), VALID);
    }

    #[tokio::test]
    async fn test_detect_duplicates_reports_later_occurrence() {
        let (_dir, store) = store_with("k1:v1\nk2:v2\nk1:v1\n").await;
        let duplicates = store.detect_duplicates().await.unwrap();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].line, 3);
        assert_eq!(duplicates[0].first_line, 1);
        assert_eq!(duplicates[0].value, "k1:v1");
    }

    #[tokio::test]
    async fn test_detect_duplicates_clean_store() {
        let (_dir, store) = store_with("k1:v1\n\nk2:v2\nnot a credential line\n").await;
        assert!(store.detect_duplicates().await.unwrap().is_empty());
    }
}
