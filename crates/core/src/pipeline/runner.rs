//! The per-episode acquisition pipeline.

use crate::catalog::EpisodeDescriptor;
use crate::decryptor::StreamDecryptor;
use crate::extractor::ExtractionResult;
use crate::fetcher::{locate_artifacts, FetchRequest, StreamFetcher};
use crate::keystore::Credential;
use crate::library::Library;
use crate::pipeline::{PipelineError, PipelineOutcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Runs one episode from captured manifest to published file.
///
/// Stages run strictly in order: fetch, locate artifacts, decrypt both
/// streams, merge, cleanup, publish. Encrypted artifacts land in the
/// downloads directory where the fetch tool puts them; decrypted streams
/// and the merged file go to the scratch directory. Cleanup of the four
/// intermediates is tied to merge success alone; a later publication
/// failure leaves the merged file in the scratch directory but never
/// resurrects intermediates.
pub struct EpisodePipeline {
    fetcher: Arc<dyn StreamFetcher>,
    decryptor: Arc<dyn StreamDecryptor>,
    library: Arc<Library>,
    downloads_dir: PathBuf,
    temp_dir: PathBuf,
}

impl EpisodePipeline {
    pub fn new(
        fetcher: Arc<dyn StreamFetcher>,
        decryptor: Arc<dyn StreamDecryptor>,
        library: Arc<Library>,
        downloads_dir: PathBuf,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            fetcher,
            decryptor,
            library,
            downloads_dir,
            temp_dir,
        }
    }

    pub async fn run(
        &self,
        episode: &EpisodeDescriptor,
        session: &ExtractionResult,
        credential: &Credential,
    ) -> Result<PipelineOutcome, PipelineError> {
        let save_name = episode.safe_title();

        self.fetcher
            .fetch(&FetchRequest {
                manifest_url: session.manifest_url.clone(),
                save_name: save_name.clone(),
                save_dir: self.downloads_dir.clone(),
                cookies: session.cookies.clone(),
                referer: session.referer.clone(),
                user_agent: session.user_agent.clone(),
            })
            .await?;

        let artifacts = locate_artifacts(&self.downloads_dir, &save_name)?;

        tokio::fs::create_dir_all(&self.temp_dir)
            .await
            .map_err(|source| PipelineError::WorkDir {
                path: self.temp_dir.clone(),
                source,
            })?;
        let decrypted_video = self.temp_dir.join(format!("{save_name}_dec_video.mp4"));
        let decrypted_audio = self.temp_dir.join(format!("{save_name}_dec_audio.m4a"));
        let key = credential.key();

        info!(episode = episode.episode, "Decrypting video stream");
        self.decryptor
            .decrypt(&artifacts.video, &decrypted_video, key)
            .await?;
        info!(episode = episode.episode, "Decrypting audio stream");
        self.decryptor
            .decrypt(&artifacts.audio, &decrypted_audio, key)
            .await?;

        let merged = self.temp_dir.join(format!("{save_name}_FINAL.mp4"));
        info!(episode = episode.episode, "Merging decrypted streams");
        self.decryptor
            .merge(&decrypted_video, &decrypted_audio, &merged)
            .await?;

        cleanup(&[
            &artifacts.video,
            &artifacts.audio,
            &decrypted_video,
            &decrypted_audio,
        ])
        .await;

        match self.library.publish(&merged, &episode.full_title).await {
            Ok(path) => Ok(PipelineOutcome {
                final_path: path,
                published: true,
            }),
            Err(error) => {
                warn!(%error, "Could not publish episode, leaving it in the work directory");
                Ok(PipelineOutcome {
                    final_path: merged,
                    published: false,
                })
            }
        }
    }
}

/// Remove intermediate files, logging failures instead of raising them.
async fn cleanup(paths: &[&Path]) {
    for path in paths {
        if let Err(error) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), %error, "Could not remove intermediate file");
        }
    }
}
