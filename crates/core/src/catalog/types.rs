//! Types for the episode catalog (discovery cache snapshot).

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::SeriesConfig;

/// Pattern locating the true episode number inside an observed page title,
/// e.g. "Programa 7" or "La isla de las tentaciones: Capítulo 12".
const EPISODE_NUMBER_PATTERN: &str = r"(?i)(?:parte|programa|cap[íi]tulo|episodio|p)(?:\s+|:|-)*([0-9]+)";

/// One episode as listed by the discovery collaborator.
///
/// Serialized camelCase because the cache file is shared with the external
/// discovery step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDescriptor {
    /// On-page title as discovered (e.g. "Programa 9").
    pub title: String,
    /// Episode player page.
    pub url: String,
    /// Season number.
    pub season: u32,
    /// Episode number, 1-based. Primary correlation key into the credential
    /// store and may be corrected mid-run from the observed page title.
    pub episode: u32,
    /// Normalized release title, e.g.
    /// "La isla de las tentaciones S09E07 [WEB-DL 1080p ES]".
    pub full_title: String,
}

impl EpisodeDescriptor {
    /// Filesystem-safe variant of the normalized title.
    pub fn safe_title(&self) -> String {
        sanitize_title(&self.full_title)
    }

    /// Correct episode number and normalized title from the page title
    /// observed during extraction. Returns the new number when a change was
    /// applied. The on-disk discovery cache is never rewritten; the
    /// correction lives only for the rest of this run.
    pub fn apply_observed_title(
        &mut self,
        observed_title: &str,
        series: &SeriesConfig,
    ) -> Option<u32> {
        let real_episode = extract_episode_number(observed_title)?;
        if real_episode == self.episode {
            return None;
        }
        self.episode = real_episode;
        self.full_title = build_full_title(series, real_episode);
        Some(real_episode)
    }
}

/// Build the normalized release title for an episode of the configured
/// series, zero-padding season and episode to two digits.
pub fn build_full_title(series: &SeriesConfig, episode: u32) -> String {
    format!(
        "{} S{:02}E{:02} {}",
        series.name, series.season, episode, series.release_tag
    )
}

/// Extract an episode number from an observed page title, if present.
pub fn extract_episode_number(title: &str) -> Option<u32> {
    let re = Regex::new(EPISODE_NUMBER_PATTERN).ok()?;
    let captures = re.captures(title)?;
    captures.get(1)?.as_str().parse().ok()
}

/// Replace every character outside the filename allow-list (alphanumerics,
/// `_`, `-`, `.`, space, `[`, `]`) with an underscore.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' => c,
            '_' | '-' | '.' | ' ' | '[' | ']' => c,
            _ => '_',
        })
        .collect()
}

/// Errors for discovery cache operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The cache file does not exist.
    #[error("Discovery cache not found at {path}")]
    CacheMissing { path: PathBuf },

    /// The cache file could not be read.
    #[error("Failed to read discovery cache {path}: {source}")]
    CacheRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The cache file is not a valid descriptor array.
    #[error("Failed to parse discovery cache {path}: {source}")]
    CacheParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors from the external discovery collaborator.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No refresh command configured; only the existing cache can be used.
    #[error("No discovery command configured")]
    NotConfigured,

    /// The discovery command could not be started.
    #[error("Failed to spawn discovery command '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The discovery command ran but reported failure.
    #[error("Discovery command failed with exit code {code:?}")]
    Failed { code: Option<i32> },

    /// The discovery command exceeded its time budget.
    #[error("Discovery command timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// I/O failure while waiting on the command.
    #[error("Discovery I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiscoveryError {
    /// Whether another attempt could plausibly succeed. A missing command
    /// configuration never will.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, DiscoveryError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> SeriesConfig {
        SeriesConfig::default()
    }

    #[test]
    fn test_descriptor_camel_case_json() {
        let json = r#"{
            "title": "Programa 9",
            "url": "https://example.es/programa-9",
            "season": 9,
            "episode": 9,
            "fullTitle": "La isla de las tentaciones S09E09 [WEB-DL 1080p ES]"
        }"#;
        let ep: EpisodeDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(ep.episode, 9);
        assert_eq!(
            ep.full_title,
            "La isla de las tentaciones S09E09 [WEB-DL 1080p ES]"
        );

        let back = serde_json::to_string(&ep).unwrap();
        assert!(back.contains("\"fullTitle\""));
    }

    #[test]
    fn test_extract_episode_number_variants() {
        assert_eq!(extract_episode_number("Programa 7"), Some(7));
        assert_eq!(extract_episode_number("programa 12 completo"), Some(12));
        assert_eq!(extract_episode_number("Capítulo: 3"), Some(3));
        assert_eq!(extract_episode_number("Episodio-10"), Some(10));
        assert_eq!(extract_episode_number("Temporada final"), None);
        assert_eq!(extract_episode_number(""), None);
    }

    #[test]
    fn test_apply_observed_title_corrects_number_and_title() {
        let mut ep = EpisodeDescriptor {
            title: "Programa 99".to_string(),
            url: "https://example.es/ep".to_string(),
            season: 9,
            episode: 99,
            full_title: build_full_title(&series(), 99),
        };

        let corrected = ep.apply_observed_title("Programa 7", &series());
        assert_eq!(corrected, Some(7));
        assert_eq!(ep.episode, 7);
        assert_eq!(
            ep.full_title,
            "La isla de las tentaciones S09E07 [WEB-DL 1080p ES]"
        );
    }

    #[test]
    fn test_apply_observed_title_no_change_when_number_matches() {
        let mut ep = EpisodeDescriptor {
            title: "Programa 7".to_string(),
            url: "https://example.es/ep".to_string(),
            season: 9,
            episode: 7,
            full_title: build_full_title(&series(), 7),
        };
        assert_eq!(ep.apply_observed_title("Programa 7", &series()), None);
        assert_eq!(ep.episode, 7);
    }

    #[test]
    fn test_apply_observed_title_ignores_unparseable_title() {
        let mut ep = EpisodeDescriptor {
            title: "x".to_string(),
            url: "u".to_string(),
            season: 9,
            episode: 5,
            full_title: build_full_title(&series(), 5),
        };
        assert_eq!(ep.apply_observed_title("Mitele PLUS", &series()), None);
        assert_eq!(ep.episode, 5);
    }

    #[test]
    fn test_sanitize_title_allow_list() {
        assert_eq!(
            sanitize_title("La isla S09E07 [WEB-DL 1080p ES]"),
            "La isla S09E07 [WEB-DL 1080p ES]"
        );
        assert_eq!(sanitize_title("a/b\\c:d*e?f"), "a_b_c_d_e_f");
        assert_eq!(sanitize_title("ción"), "ci_n");
    }

    #[test]
    fn test_discovery_error_retryability() {
        assert!(!DiscoveryError::NotConfigured.is_retryable());
        assert!(DiscoveryError::Failed { code: Some(1) }.is_retryable());
        assert!(DiscoveryError::Timeout { timeout_secs: 60 }.is_retryable());
    }

    #[test]
    fn test_build_full_title_padding() {
        assert_eq!(
            build_full_title(&series(), 7),
            "La isla de las tentaciones S09E07 [WEB-DL 1080p ES]"
        );
        assert_eq!(
            build_full_title(&series(), 12),
            "La isla de las tentaciones S09E12 [WEB-DL 1080p ES]"
        );
    }
}
