//! Extraction session configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for the browser-based manifest extraction session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionConfig {
    /// Path to the extractor binary spawned per episode. When unset, a
    /// sibling of the current executable named `tentador-extract` is used.
    #[serde(default)]
    pub command: Option<PathBuf>,

    /// User agent presented by the browser and forwarded to the fetcher.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Referer forwarded to the fetcher alongside captured cookies.
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Substring that marks a request URL as a manifest.
    #[serde(default = "default_manifest_marker")]
    pub manifest_marker: String,

    /// Domain substrings whose traffic is worth inspecting.
    #[serde(default = "default_watch_domains")]
    pub watch_domains: Vec<String>,

    /// Domain substrings a weak-pattern candidate must carry to be accepted.
    #[serde(default = "default_catalog_tokens")]
    pub catalog_tokens: Vec<String>,

    /// Domain substrings that disqualify a body candidate outright.
    #[serde(default = "default_deny_list")]
    pub deny_list: Vec<String>,

    /// CSS selector of the consent dialog's accept button.
    #[serde(default = "default_consent_selector")]
    pub consent_selector: String,

    /// How long to wait for the consent dialog to appear.
    #[serde(default = "default_consent_timeout_secs")]
    pub consent_timeout_secs: u64,

    /// Interval between checks of the capture registers.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Grace period after detection so trailing traffic can land.
    #[serde(default = "default_settle_secs")]
    pub settle_secs: u64,

    /// Overall deadline for one extraction session.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Persistent browser profile directory. When unset the browser runs
    /// with a throwaway profile.
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,

    /// Browser window width in pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,

    /// Browser window height in pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_referer() -> String {
    "https://www.mediasetinfinity.es/".to_string()
}

fn default_manifest_marker() -> String {
    ".mpd".to_string()
}

fn default_watch_domains() -> Vec<String> {
    vec!["mediaset".to_string(), "theplatform".to_string()]
}

fn default_catalog_tokens() -> Vec<String> {
    vec!["mediaset".to_string()]
}

fn default_deny_list() -> Vec<String> {
    vec![
        "googlevideo".to_string(),
        "doubleclick".to_string(),
        "springserve".to_string(),
    ]
}

fn default_consent_selector() -> String {
    "#didomi-notice-agree-button".to_string()
}

fn default_consent_timeout_secs() -> u64 {
    5
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_settle_secs() -> u64 {
    2
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_window_width() -> u32 {
    1280
}

fn default_window_height() -> u32 {
    720
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            command: None,
            user_agent: default_user_agent(),
            referer: default_referer(),
            manifest_marker: default_manifest_marker(),
            watch_domains: default_watch_domains(),
            catalog_tokens: default_catalog_tokens(),
            deny_list: default_deny_list(),
            consent_selector: default_consent_selector(),
            consent_timeout_secs: default_consent_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            settle_secs: default_settle_secs(),
            timeout_secs: default_timeout_secs(),
            profile_dir: None,
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl ExtractionConfig {
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    pub fn with_profile_dir(mut self, profile_dir: PathBuf) -> Self {
        self.profile_dir = Some(profile_dir);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractionConfig::default();
        assert_eq!(config.manifest_marker, ".mpd");
        assert_eq!(config.timeout_secs, 600);
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.settle_secs, 2);
        assert_eq!(config.consent_timeout_secs, 5);
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.window_height, 720);
        assert!(config.command.is_none());
        assert!(config.profile_dir.is_none());
        assert!(config.deny_list.contains(&"doubleclick".to_string()));
        assert!(config.catalog_tokens.contains(&"mediaset".to_string()));
    }

    #[test]
    fn test_deserialize_minimal_config() {
        let toml_str = "";
        let config: ExtractionConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config, ExtractionConfig::default());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
            user_agent = "TestAgent/1.0"
            referer = "https://example.es/"
            manifest_marker = ".m3u8"
            watch_domains = ["example"]
            catalog_tokens = ["example"]
            deny_list = ["ads"]
            consent_selector = "#accept"
            consent_timeout_secs = 2
            poll_interval_ms = 250
            settle_secs = 0
            timeout_secs = 30
            profile_dir = "/tmp/profile"
            window_width = 1920
            window_height = 1080
        "#;
        let config: ExtractionConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.user_agent, "TestAgent/1.0");
        assert_eq!(config.manifest_marker, ".m3u8");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.profile_dir, Some(PathBuf::from("/tmp/profile")));
        assert_eq!(config.window_width, 1920);
    }

    #[test]
    fn test_builder_methods() {
        let config = ExtractionConfig::default()
            .with_timeout_secs(5)
            .with_poll_interval_ms(100);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.poll_interval_ms, 100);
    }
}
