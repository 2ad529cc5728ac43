use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::DiscoveryConfig;
use crate::decryptor::DecryptorConfig;
use crate::extractor::ExtractionConfig;
use crate::fetcher::FetcherConfig;
use crate::library::LibraryConfig;
use crate::orchestrator::OrchestratorConfig;
use crate::resolver::ResolverConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub series: SeriesConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub decryptor: DecryptorConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// The series being acquired. Name and season feed the normalized titles
/// under which episodes are published.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeriesConfig {
    /// Display name used in published filenames.
    #[serde(default = "default_series_name")]
    pub name: String,

    /// Season number (1-based).
    #[serde(default = "default_season")]
    pub season: u32,

    /// Catalog listing page, handed to the discovery collaborator.
    #[serde(default = "default_series_url")]
    pub url: String,

    /// Trailing tag appended to normalized titles.
    #[serde(default = "default_release_tag")]
    pub release_tag: String,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            name: default_series_name(),
            season: default_season(),
            url: default_series_url(),
            release_tag: default_release_tag(),
        }
    }
}

fn default_series_name() -> String {
    "La isla de las tentaciones".to_string()
}

fn default_season() -> u32 {
    9
}

fn default_series_url() -> String {
    "https://www.mediasetinfinity.es/programas-tv/la-isla-de-las-tentaciones/temporada-9/episodios/"
        .to_string()
}

fn default_release_tag() -> String {
    "[WEB-DL 1080p ES]".to_string()
}

/// Working-directory layout. Directories are created on demand.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Where the fetch tool deposits encrypted streams.
    #[serde(default = "default_downloads_dir")]
    pub downloads: PathBuf,

    /// Scratch space for decrypted intermediates.
    #[serde(default = "default_temp_dir")]
    pub temp: PathBuf,

    /// Credential store: line N holds the key for episode N.
    #[serde(default = "default_keys_file")]
    pub keys_file: PathBuf,

    /// Discovery cache written by the discovery collaborator.
    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            downloads: default_downloads_dir(),
            temp: default_temp_dir(),
            keys_file: default_keys_file(),
            cache_file: default_cache_file(),
        }
    }
}

fn default_downloads_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("temp")
}

fn default_keys_file() -> PathBuf {
    PathBuf::from("keys.txt")
}

fn default_cache_file() -> PathBuf {
    PathBuf::from("monitor_results.json")
}
