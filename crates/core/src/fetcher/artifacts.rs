//! Locating the streams a fetch left behind.

use crate::fetcher::{FetcherError, StreamArtifacts};
use std::path::Path;
use tracing::debug;

/// Find the separated video and audio streams for a completed fetch.
///
/// The fetch tool derives final names from the save name, appending its own
/// quality and codec suffixes, so artifacts are matched by prefix and
/// extension rather than exact name. Both streams must exist; a fetch that
/// produced only one of them counts as failed.
pub fn locate_artifacts(dir: &Path, save_name: &str) -> Result<StreamArtifacts, FetcherError> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();

    let mut video = None;
    let mut audio = None;
    for name in &names {
        if !name.starts_with(save_name) {
            continue;
        }
        if video.is_none() && name.ends_with(".mp4") {
            video = Some(dir.join(name));
        } else if audio.is_none() && name.ends_with(".m4a") {
            audio = Some(dir.join(name));
        }
    }

    match (video, audio) {
        (Some(video), Some(audio)) => {
            debug!(video = %video.display(), audio = %audio.display(), "Located stream artifacts");
            Ok(StreamArtifacts { video, audio })
        }
        _ => Err(FetcherError::ArtifactsNotFound {
            save_name: save_name.to_string(),
            dir: dir.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }

    #[test]
    fn test_locates_both_streams() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "Show S09E07 [WEB-DL].1920x1080.mp4");
        touch(&dir, "Show S09E07 [WEB-DL].es.m4a");
        touch(&dir, "unrelated.mp4");

        let artifacts = locate_artifacts(dir.path(), "Show S09E07 [WEB-DL]").unwrap();
        assert!(artifacts
            .video
            .ends_with("Show S09E07 [WEB-DL].1920x1080.mp4"));
        assert!(artifacts.audio.ends_with("Show S09E07 [WEB-DL].es.m4a"));
    }

    #[test]
    fn test_missing_audio_is_an_error() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "Show S09E07.mp4");

        let err = locate_artifacts(dir.path(), "Show S09E07").unwrap_err();
        assert!(matches!(err, FetcherError::ArtifactsNotFound { .. }));
    }

    #[test]
    fn test_missing_video_is_an_error() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "Show S09E07.m4a");

        let err = locate_artifacts(dir.path(), "Show S09E07").unwrap_err();
        assert!(matches!(err, FetcherError::ArtifactsNotFound { .. }));
    }

    #[test]
    fn test_foreign_prefixes_ignored() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "Other S09E06.mp4");
        touch(&dir, "Other S09E06.m4a");

        let err = locate_artifacts(dir.path(), "Show S09E07").unwrap_err();
        match err {
            FetcherError::ArtifactsNotFound { save_name, .. } => {
                assert_eq!(save_name, "Show S09E07");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_first_match_by_sorted_name() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "Show S09E07.copy.mp4");
        touch(&dir, "Show S09E07.best.mp4");
        touch(&dir, "Show S09E07.m4a");

        let artifacts = locate_artifacts(dir.path(), "Show S09E07").unwrap();
        assert!(artifacts.video.ends_with("Show S09E07.best.mp4"));
    }
}
