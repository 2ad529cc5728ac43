//! Stream fetching through an external download tool.
//!
//! # Features
//!
//! - Structured argv construction, never shell strings
//! - Header sanitization at the subprocess boundary
//! - Artifact location by save-name prefix and stream extension
//! - stdio passthrough so the tool's progress UI stays visible

mod artifacts;
mod config;
mod downloader;
mod headers;
mod traits;
mod types;

pub use artifacts::locate_artifacts;
pub use config::FetcherConfig;
pub use downloader::CommandFetcher;
pub use headers::sanitize_header_value;
pub use traits::StreamFetcher;
pub use types::{FetchRequest, FetcherError, StreamArtifacts};
