//! Extraction result types.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Everything one extraction session observed that downstream stages need.
///
/// Serialized as a single camelCase JSON object. The extractor binary prints
/// exactly one of these on stdout; all diagnostics go to stderr.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// The captured manifest URL.
    pub manifest_url: String,

    /// Cookie header value observed on catalog traffic, possibly empty.
    #[serde(default)]
    pub cookies: String,

    /// User agent the session presented.
    #[serde(default)]
    pub user_agent: String,

    /// Referer to present when fetching the manifest.
    #[serde(default)]
    pub referer: String,

    /// Page title at detection time, used for episode number correction.
    #[serde(default)]
    pub page_title: String,
}

impl ExtractionResult {
    /// Pull the result object out of possibly noisy subprocess output.
    ///
    /// Prefers a result object embedded in surrounding text, then falls back
    /// to parsing the trimmed output as a clean JSON document.
    pub fn from_mixed_output(output: &str) -> Option<Self> {
        if let Ok(re) = Regex::new(r#"\{"manifestUrl":.*\}"#) {
            if let Some(matched) = re.find(output) {
                if let Ok(result) = serde_json::from_str(matched.as_str()) {
                    return Some(result);
                }
            }
        }
        serde_json::from_str(output.trim()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> String {
        concat!(
            r#"{"manifestUrl":"https://cdn.mediaset.example/a.mpd","#,
            r#""cookies":"session=abc","userAgent":"UA","#,
            r#""referer":"https://www.mediasetinfinity.es/","pageTitle":"Programa 7"}"#,
        )
        .to_string()
    }

    #[test]
    fn test_parse_clean_output() {
        let result = ExtractionResult::from_mixed_output(&sample_json()).unwrap();
        assert_eq!(result.manifest_url, "https://cdn.mediaset.example/a.mpd");
        assert_eq!(result.cookies, "session=abc");
        assert_eq!(result.page_title, "Programa 7");
    }

    #[test]
    fn test_parse_output_with_surrounding_noise() {
        let output = format!(
            "starting up\nsome progress line\n{}\ntrailing line\n",
            sample_json()
        );
        let result = ExtractionResult::from_mixed_output(&output).unwrap();
        assert_eq!(result.manifest_url, "https://cdn.mediaset.example/a.mpd");
    }

    #[test]
    fn test_parse_output_with_noise_on_same_line() {
        let output = format!("prefix {} ", sample_json());
        let result = ExtractionResult::from_mixed_output(&output).unwrap();
        assert_eq!(result.manifest_url, "https://cdn.mediaset.example/a.mpd");
    }

    #[test]
    fn test_parse_output_without_result() {
        assert!(ExtractionResult::from_mixed_output("no json here").is_none());
        assert!(ExtractionResult::from_mixed_output("").is_none());
    }

    #[test]
    fn test_optional_fields_default_empty() {
        let output = r#"{"manifestUrl":"https://cdn.mediaset.example/a.mpd"}"#;
        let result = ExtractionResult::from_mixed_output(output).unwrap();
        assert_eq!(result.cookies, "");
        assert_eq!(result.user_agent, "");
        assert_eq!(result.page_title, "");
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let result = ExtractionResult {
            manifest_url: "https://cdn.mediaset.example/a.mpd".to_string(),
            cookies: String::new(),
            user_agent: "UA".to_string(),
            referer: String::new(),
            page_title: String::new(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"manifestUrl\""));
        assert!(json.contains("\"userAgent\""));
        assert!(json.contains("\"pageTitle\""));
        assert!(!json.contains("manifest_url"));
    }
}
