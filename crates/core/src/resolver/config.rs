//! Configuration for the key resolution flow.

use serde::{Deserialize, Serialize};

/// Configuration for the manual-capture fallback.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Browser command opened for the operator during manual capture.
    #[serde(default = "default_operator_browser")]
    pub operator_browser: String,

    /// Seconds to wait after printing the instructions before blocking on
    /// the operator gate.
    #[serde(default = "default_instruction_pause")]
    pub instruction_pause_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            operator_browser: default_operator_browser(),
            instruction_pause_secs: default_instruction_pause(),
        }
    }
}

fn default_operator_browser() -> String {
    "firefox".to_string()
}

fn default_instruction_pause() -> u64 {
    3
}
