pub mod catalog;
pub mod config;
pub mod decryptor;
pub mod extractor;
pub mod fetcher;
pub mod keystore;
pub mod library;
pub mod orchestrator;
pub mod pipeline;
pub mod resolver;
pub mod testing;

pub use catalog::{CommandDiscovery, Discovery, DiscoveryCache, EpisodeDescriptor};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError,
};
pub use decryptor::{FfmpegDecryptor, StreamDecryptor};
pub use extractor::{BrowserSession, ExtractionResult, ManifestExtractor, SubprocessExtractor};
pub use fetcher::{CommandFetcher, StreamFetcher};
pub use keystore::{Credential, KeyStore};
pub use library::Library;
pub use orchestrator::{BatchReport, EpisodeOutcome, Orchestrator, OrchestratorError};
pub use pipeline::EpisodePipeline;
pub use resolver::{KeyResolution, KeyResolver, ManualCapture, StdinPrompt};
