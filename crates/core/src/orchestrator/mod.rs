//! Batch orchestration over the discovered episode listing.
//!
//! A run is one pass: refresh the listing (degrading to the cached snapshot
//! when refresh fails), then drive every episode through key resolution,
//! manifest extraction and the acquisition pipeline. Episode failures are
//! reported in the batch report and never abort the run.

mod config;
mod retry;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use retry::retry_with_backoff;
pub use runner::Orchestrator;
pub use types::{BatchReport, EpisodeOutcome, OrchestratorError};
