//! Per-episode download, decrypt, merge and publish pipeline.
//!
//! # Features
//!
//! - Strict stage ordering with fail-fast propagation
//! - Artifact location decoupled from the fetch tool's naming quirks
//! - Intermediate cleanup bound to merge success only
//! - Publication failure downgraded to a warning, never a lost episode

mod runner;
mod types;

pub use runner::EpisodePipeline;
pub use types::{PipelineError, PipelineOutcome};
