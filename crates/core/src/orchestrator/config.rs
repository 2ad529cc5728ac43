//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the batch orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Total attempts at refreshing the episode listing before the run
    /// degrades to the cached snapshot.
    #[serde(default = "default_discovery_attempts")]
    pub discovery_attempts: u32,

    /// Base delay between discovery attempts (milliseconds).
    /// The wait before attempt N+1 is this value times N.
    #[serde(default = "default_discovery_retry_delay")]
    pub discovery_retry_delay_ms: u64,
}

fn default_discovery_attempts() -> u32 {
    2
}

fn default_discovery_retry_delay() -> u64 {
    5000 // 5 seconds
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            discovery_attempts: default_discovery_attempts(),
            discovery_retry_delay_ms: default_discovery_retry_delay(),
        }
    }
}
