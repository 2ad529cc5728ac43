//! Manifest URL detection over observed browser traffic.

use crate::extractor::ExtractionConfig;
use regex_lite::Regex;

const SRC_ATTRIBUTE_PATTERN: &str = r#"src=["'](https:[^"']+\.mpd[^"']*)["']"#;
const BARE_URL_PATTERN: &str = r#"(https?://[^\s"']+\.mpd)"#;

/// A manifest URL candidate pulled out of a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    /// Weak-pattern candidates must also carry a catalog token.
    pub needs_catalog_token: bool,
}

/// One pattern matcher over a buffered response body.
pub trait BodyDetector: Send + Sync {
    fn name(&self) -> &'static str;
    fn detect(&self, body: &str) -> Option<Candidate>;
}

/// Matches a quoted `src` attribute pointing at a manifest. This is the
/// strong signal: a player was handed the URL directly.
pub struct SrcAttributeDetector;

impl BodyDetector for SrcAttributeDetector {
    fn name(&self) -> &'static str {
        "src-attribute"
    }

    fn detect(&self, body: &str) -> Option<Candidate> {
        let re = Regex::new(SRC_ATTRIBUTE_PATTERN).ok()?;
        let captures = re.captures(body)?;
        Some(Candidate {
            url: captures.get(1)?.as_str().to_string(),
            needs_catalog_token: false,
        })
    }
}

/// Matches any bare manifest URL in the body. The weakest signal, so a
/// match only counts when the URL carries a catalog token.
pub struct BareUrlDetector;

impl BodyDetector for BareUrlDetector {
    fn name(&self) -> &'static str {
        "bare-url"
    }

    fn detect(&self, body: &str) -> Option<Candidate> {
        let re = Regex::new(BARE_URL_PATTERN).ok()?;
        let captures = re.captures(body)?;
        Some(Candidate {
            url: captures.get(1)?.as_str().to_string(),
            needs_catalog_token: true,
        })
    }
}

/// Ordered detector chain plus the acceptance rules applied to every
/// candidate.
///
/// Detectors run in order against each body; a candidate rejected by the
/// deny list or the catalog-token rule does not stop later detectors from
/// being tried.
pub struct ManifestSniffer {
    detectors: Vec<Box<dyn BodyDetector>>,
    manifest_marker: String,
    watch_domains: Vec<String>,
    catalog_tokens: Vec<String>,
    deny_list: Vec<String>,
}

impl ManifestSniffer {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            detectors: vec![Box::new(SrcAttributeDetector), Box::new(BareUrlDetector)],
            manifest_marker: config.manifest_marker.clone(),
            watch_domains: config.watch_domains.clone(),
            catalog_tokens: config.catalog_tokens.clone(),
            deny_list: config.deny_list.clone(),
        }
    }

    /// Replace the detector chain, preserving the acceptance rules.
    pub fn with_detectors(mut self, detectors: Vec<Box<dyn BodyDetector>>) -> Self {
        self.detectors = detectors;
        self
    }

    /// Does this request URL itself name a manifest?
    pub fn is_manifest_request(&self, url: &str) -> bool {
        url.contains(&self.manifest_marker)
    }

    /// Does this request go to the catalog itself? Session headers are
    /// captured from the first such request.
    pub fn is_catalog_request(&self, url: &str) -> bool {
        self.catalog_tokens.iter().any(|token| url.contains(token))
    }

    /// Is this response worth buffering? Only text-like payloads from
    /// watched domains are inspected.
    pub fn is_relevant_response(&self, url: &str, mime_type: &str) -> bool {
        if !self.watch_domains.iter().any(|domain| url.contains(domain)) {
            return false;
        }
        let mime = mime_type.to_ascii_lowercase();
        mime.contains("json") || mime.contains("xml") || mime.contains("text")
    }

    /// Scan one response body. The first candidate that survives the
    /// acceptance rules wins.
    pub fn scan_body(&self, body: &str) -> Option<String> {
        for detector in &self.detectors {
            if let Some(candidate) = detector.detect(body) {
                if self.accepts(&candidate) {
                    return Some(candidate.url);
                }
            }
        }
        None
    }

    fn accepts(&self, candidate: &Candidate) -> bool {
        if self.deny_list.iter().any(|token| candidate.url.contains(token)) {
            return false;
        }
        if candidate.needs_catalog_token
            && !self
                .catalog_tokens
                .iter()
                .any(|token| candidate.url.contains(token))
        {
            return false;
        }
        true
    }
}
