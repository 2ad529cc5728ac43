//! The batch orchestrator.
//!
//! One run is a single pass over the discovered episode listing, newest
//! first. Each episode goes through key resolution, manifest extraction and
//! the acquisition pipeline; a failure is contained to the episode that
//! raised it. Only an unusable episode listing aborts the whole batch.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::catalog::{Discovery, DiscoveryCache, DiscoveryError, EpisodeDescriptor};
use crate::config::SeriesConfig;
use crate::extractor::ManifestExtractor;
use crate::keystore::KeyStore;
use crate::library::Library;
use crate::pipeline::EpisodePipeline;
use crate::resolver::{KeyResolution, KeyResolver};

use super::retry::retry_with_backoff;
use super::{BatchReport, EpisodeOutcome, OrchestratorConfig, OrchestratorError};

/// Drives one batch run over the discovered episode listing.
pub struct Orchestrator {
    config: OrchestratorConfig,
    series: SeriesConfig,
    discovery: Arc<dyn Discovery>,
    cache: DiscoveryCache,
    keystore: KeyStore,
    resolver: KeyResolver,
    extractor: Arc<dyn ManifestExtractor>,
    pipeline: EpisodePipeline,
    library: Arc<Library>,
    downloads_dir: PathBuf,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: OrchestratorConfig,
        series: SeriesConfig,
        discovery: Arc<dyn Discovery>,
        cache: DiscoveryCache,
        keystore: KeyStore,
        resolver: KeyResolver,
        extractor: Arc<dyn ManifestExtractor>,
        pipeline: EpisodePipeline,
        library: Arc<Library>,
        downloads_dir: PathBuf,
    ) -> Self {
        Self {
            config,
            series,
            discovery,
            cache,
            keystore,
            resolver,
            extractor,
            pipeline,
            library,
            downloads_dir,
        }
    }

    /// Run one full batch over the episode listing.
    pub async fn run(&self) -> Result<BatchReport, OrchestratorError> {
        let started_at = Utc::now();
        info!(
            series = %self.series.name,
            season = self.series.season,
            "Starting batch run"
        );

        tokio::fs::create_dir_all(&self.downloads_dir)
            .await
            .map_err(|source| OrchestratorError::WorkDir {
                path: self.downloads_dir.clone(),
                source,
            })?;

        let used_cached_listing = self.refresh_listing().await?;
        let episodes = self.cache.load().await?;
        info!(count = episodes.len(), "Episode listing loaded");

        let mut outcomes = Vec::with_capacity(episodes.len());
        let mut store_checked = false;
        for mut episode in episodes {
            let outcome = self.run_episode(&mut episode, &mut store_checked).await;
            outcomes.push(outcome);
        }

        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            used_cached_listing,
            outcomes,
        };
        info!(
            completed = report.completed(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Batch run finished"
        );
        Ok(report)
    }

    /// Refresh the episode listing, retrying transient failures. When the
    /// refresh cannot succeed the run degrades to the cached snapshot;
    /// returns true on that degraded path.
    async fn refresh_listing(&self) -> Result<bool, OrchestratorError> {
        let result = retry_with_backoff(
            self.config.discovery_attempts,
            Duration::from_millis(self.config.discovery_retry_delay_ms),
            "Episode discovery",
            DiscoveryError::is_retryable,
            || self.discovery.refresh(),
        )
        .await;

        match result {
            Ok(()) => {
                debug!(backend = self.discovery.name(), "Episode listing refreshed");
                Ok(false)
            }
            Err(error) => {
                if self.cache.exists().await {
                    warn!(%error, "Discovery unavailable, using the cached episode listing");
                    Ok(true)
                } else {
                    error!(%error, "Discovery failed and no cached episode listing exists");
                    Err(OrchestratorError::NoEpisodeListing {
                        path: self.cache.path().to_path_buf(),
                    })
                }
            }
        }
    }

    async fn run_episode(
        &self,
        episode: &mut EpisodeDescriptor,
        store_checked: &mut bool,
    ) -> EpisodeOutcome {
        info!(
            episode = episode.episode,
            title = %episode.title,
            "Processing episode"
        );

        if self.library.is_published(&episode.full_title) {
            info!(episode = episode.episode, "Already in the library, skipping");
            return EpisodeOutcome::AlreadyPublished {
                episode: episode.episode,
                full_title: episode.full_title.clone(),
            };
        }

        // Store hygiene runs once per batch, at the first episode that
        // actually needs a key.
        if !*store_checked {
            *store_checked = true;
            self.warn_duplicate_credentials().await;
        }

        let static_credential = match self.resolver.check_static(episode.episode).await {
            Ok(credential) => credential,
            Err(error) => {
                warn!(
                    episode = episode.episode,
                    %error,
                    "Credential store unreadable, treating the key as unknown"
                );
                None
            }
        };

        // Extraction runs whether or not a key is known: the browser session
        // is also where the operator captures a missing key.
        let session = match self
            .extractor
            .extract(&episode.url, static_credential.is_some())
            .await
        {
            Ok(session) => session,
            Err(error) => {
                error!(episode = episode.episode, %error, "Manifest extraction failed");
                return EpisodeOutcome::Failed {
                    episode: episode.episode,
                    full_title: episode.full_title.clone(),
                    reason: error.to_string(),
                };
            }
        };

        // The listing sometimes mislabels episodes; the observed page title
        // is authoritative. The correction holds for the rest of this run
        // and is never written back to the listing.
        if let Some(corrected) = episode.apply_observed_title(&session.page_title, &self.series) {
            info!(
                episode = corrected,
                full_title = %episode.full_title,
                "Episode number corrected from the observed page title"
            );
        }

        let resolution = match self.resolver.resolve(episode, static_credential).await {
            Ok(resolution) => resolution,
            Err(error) => {
                error!(episode = episode.episode, %error, "Key resolution failed");
                return EpisodeOutcome::Failed {
                    episode: episode.episode,
                    full_title: episode.full_title.clone(),
                    reason: error.to_string(),
                };
            }
        };
        let credential = match resolution {
            KeyResolution::Resolved { credential, source } => {
                debug!(episode = episode.episode, ?source, "Credential resolved");
                credential
            }
            KeyResolution::Skipped { .. } => {
                return EpisodeOutcome::NoCredential {
                    episode: episode.episode,
                    full_title: episode.full_title.clone(),
                };
            }
        };

        match self.pipeline.run(episode, &session, &credential).await {
            Ok(outcome) => {
                info!(
                    episode = episode.episode,
                    path = %outcome.final_path.display(),
                    published = outcome.published,
                    "Episode completed"
                );
                EpisodeOutcome::Completed {
                    episode: episode.episode,
                    full_title: episode.full_title.clone(),
                    final_path: outcome.final_path,
                    published: outcome.published,
                }
            }
            Err(error) => {
                error!(episode = episode.episode, %error, "Episode pipeline failed");
                EpisodeOutcome::Failed {
                    episode: episode.episode,
                    full_title: episode.full_title.clone(),
                    reason: error.to_string(),
                }
            }
        }
    }

    /// Warn about repeated credential values. Line N maps to episode N, so a
    /// repeated value usually means a paste landed on the wrong line.
    async fn warn_duplicate_credentials(&self) {
        match self.keystore.detect_duplicates().await {
            Ok(duplicates) => {
                for duplicate in duplicates {
                    warn!(
                        line = duplicate.line,
                        first_line = duplicate.first_line,
                        "Credential store repeats an earlier key, check the line mapping"
                    );
                }
            }
            Err(error) => {
                warn!(%error, "Could not scan the credential store for duplicates");
            }
        }
    }
}
