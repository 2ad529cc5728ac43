//! Batch run outcomes and orchestrator errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Terminal state of one episode within a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EpisodeOutcome {
    /// Ran the full pipeline. `published` is false when the finished file
    /// could not be moved into the library and was left in the work
    /// directory instead.
    Completed {
        episode: u32,
        full_title: String,
        final_path: PathBuf,
        published: bool,
    },

    /// Already present in the library; nothing ran.
    AlreadyPublished { episode: u32, full_title: String },

    /// No usable credential, even after the manual-capture gate.
    NoCredential { episode: u32, full_title: String },

    /// A stage failed. Later episodes still run.
    Failed {
        episode: u32,
        full_title: String,
        reason: String,
    },
}

impl EpisodeOutcome {
    pub fn episode(&self) -> u32 {
        match self {
            Self::Completed { episode, .. }
            | Self::AlreadyPublished { episode, .. }
            | Self::NoCredential { episode, .. }
            | Self::Failed { episode, .. } => *episode,
        }
    }
}

/// Summary of one whole batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// True when discovery failed and the run fell back to the cached
    /// episode listing.
    pub used_cached_listing: bool,
    /// Per-episode outcomes, in processing order (newest first).
    pub outcomes: Vec<EpisodeOutcome>,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EpisodeOutcome::Completed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o,
                    EpisodeOutcome::AlreadyPublished { .. } | EpisodeOutcome::NoCredential { .. }
                )
            })
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EpisodeOutcome::Failed { .. }))
            .count()
    }
}

/// Errors that end the whole batch. Anything that can be isolated to one
/// episode is reported as [`EpisodeOutcome::Failed`] instead.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Discovery failed and there is no cached listing to degrade to.
    #[error("Discovery failed and no cached episode listing exists at {path}")]
    NoEpisodeListing { path: PathBuf },

    /// The episode listing on disk is unreadable or malformed.
    #[error("Episode listing error: {0}")]
    Catalog(#[from] CatalogError),

    /// A work directory could not be prepared.
    #[error("Failed to prepare work directory {path}: {source}")]
    WorkDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(episode: u32) -> EpisodeOutcome {
        EpisodeOutcome::Completed {
            episode,
            full_title: format!("Serie S09E{episode:02} [WEB-DL 1080p ES]"),
            final_path: PathBuf::from("/library/file.mp4"),
            published: true,
        }
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&completed(7)).unwrap();
        assert!(json.contains("\"status\":\"completed\""));
        assert!(json.contains("\"episode\":7"));

        let back: EpisodeOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back.episode(), 7);
    }

    #[test]
    fn test_report_counts() {
        let report = BatchReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            used_cached_listing: false,
            outcomes: vec![
                completed(9),
                EpisodeOutcome::AlreadyPublished {
                    episode: 8,
                    full_title: "t".to_string(),
                },
                EpisodeOutcome::NoCredential {
                    episode: 7,
                    full_title: "t".to_string(),
                },
                EpisodeOutcome::Failed {
                    episode: 6,
                    full_title: "t".to_string(),
                    reason: "fetch failed".to_string(),
                },
            ],
        };

        assert_eq!(report.completed(), 1);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = OrchestratorError::NoEpisodeListing {
            path: PathBuf::from("/data/monitor_results.json"),
        };
        assert!(err.to_string().contains("/data/monitor_results.json"));
        assert!(err.to_string().contains("no cached episode listing"));
    }
}
