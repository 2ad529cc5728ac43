//! In-process browser session running the observation protocol.
//!
//! The session opens a headed browser, navigates to the episode page and then
//! watches traffic through two channels: request URLs that name a manifest
//! directly, and buffered response bodies scanned by the detector chain. Both
//! channels feed the same write-once [`CaptureState`], so whichever observes
//! the manifest first wins. The session never clicks play or calls platform
//! APIs; a human (or the page itself) triggers playback.

use crate::extractor::{
    CaptureState, ExtractionConfig, ExtractionResult, ExtractorError, ManifestSniffer,
};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventRequestWillBeSent, EventResponseReceived, GetResponseBodyParams, Headers,
};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const STEALTH_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
Object.defineProperty(navigator, 'plugins', { get: () => [1, 2, 3] });
Object.defineProperty(navigator, 'languages', { get: () => ['es-ES', 'es'] });
window.chrome = { runtime: {} };
"#;

/// One extraction session in a headed browser.
pub struct BrowserSession {
    config: ExtractionConfig,
}

impl BrowserSession {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Run the observation protocol against one episode page.
    pub async fn run(&self, episode_url: &str) -> Result<ExtractionResult, ExtractorError> {
        info!(url = episode_url, "Opening browser session");

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .with_head()
            .window_size(self.config.window_width, self.config.window_height)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-dev-shm-usage")
            .arg("--lang=es-ES");
        if let Some(profile_dir) = &self.config.profile_dir {
            builder = builder.user_data_dir(profile_dir);
        }
        let browser_config = builder.build().map_err(ExtractorError::Launch)?;

        let (mut browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|error| ExtractorError::Launch(error.to_string()))?;
        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let result = self.drive(&browser, &handler_task, episode_url).await;

        let _ = browser.close().await;
        handler_task.abort();
        result
    }

    async fn drive(
        &self,
        browser: &Browser,
        handler_task: &JoinHandle<()>,
        episode_url: &str,
    ) -> Result<ExtractionResult, ExtractorError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|error| ExtractorError::Launch(error.to_string()))?;

        page.set_user_agent(self.config.user_agent.clone())
            .await
            .map_err(|error| ExtractorError::Launch(error.to_string()))?;
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(STEALTH_SCRIPT))
            .await
            .map_err(|error| ExtractorError::Launch(error.to_string()))?;
        page.execute(EnableParams::default())
            .await
            .map_err(|error| ExtractorError::Launch(error.to_string()))?;

        let capture = Arc::new(CaptureState::new());
        let sniffer = Arc::new(ManifestSniffer::new(&self.config));

        let request_task = self.watch_requests(&page, &capture, &sniffer).await?;
        let response_task = self.watch_responses(&page, &capture, &sniffer).await?;

        info!(url = episode_url, "Navigating to episode page");
        page.goto(episode_url)
            .await
            .map_err(|error| ExtractorError::Navigation(error.to_string()))?;
        let _ = page.wait_for_navigation().await;

        self.dismiss_consent(&page).await;

        let poll = Duration::from_millis(self.config.poll_interval_ms);
        let started = tokio::time::Instant::now();
        let mut ticks: u64 = 0;
        let manifest_url = loop {
            if let Some(url) = capture.manifest() {
                break url.to_string();
            }
            if handler_task.is_finished()
                || request_task.is_finished()
                || response_task.is_finished()
            {
                request_task.abort();
                response_task.abort();
                return Err(ExtractorError::SessionClosed);
            }
            if started.elapsed() >= Duration::from_secs(self.config.timeout_secs) {
                request_task.abort();
                response_task.abort();
                return Err(ExtractorError::ExtractionTimeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
            ticks += 1;
            if ticks % 30 == 0 {
                debug!(
                    elapsed_secs = started.elapsed().as_secs(),
                    "Still waiting for a manifest"
                );
            }
            tokio::time::sleep(poll).await;
        };

        info!(url = %manifest_url, "Manifest captured, letting the session settle");
        tokio::time::sleep(Duration::from_secs(self.config.settle_secs)).await;

        let page_title = match page.evaluate("document.title").await {
            Ok(evaluation) => evaluation.into_value::<String>().unwrap_or_default(),
            Err(_) => String::new(),
        };

        request_task.abort();
        response_task.abort();

        Ok(ExtractionResult {
            manifest_url,
            cookies: capture.cookie().unwrap_or_default().to_string(),
            user_agent: self.config.user_agent.clone(),
            referer: self.config.referer.clone(),
            page_title,
        })
    }

    /// Request channel: manifest URLs observed directly, plus session
    /// headers from the first catalog request.
    async fn watch_requests(
        &self,
        page: &Page,
        capture: &Arc<CaptureState>,
        sniffer: &Arc<ManifestSniffer>,
    ) -> Result<JoinHandle<()>, ExtractorError> {
        let mut requests = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(|error| ExtractorError::Launch(error.to_string()))?;
        let capture = capture.clone();
        let sniffer = sniffer.clone();

        Ok(tokio::spawn(async move {
            while let Some(event) = requests.next().await {
                let url = event.request.url.as_str();
                if sniffer.is_manifest_request(url) && capture.record_manifest(url) {
                    info!(%url, "Manifest URL observed in request stream");
                }
                if !capture.headers_recorded()
                    && sniffer.is_catalog_request(url)
                    && capture.record_headers(flatten_headers(&event.request.headers))
                {
                    debug!(%url, "Session headers captured");
                }
            }
        }))
    }

    /// Response channel: buffer text-like bodies from watched domains and
    /// run the detector chain over them.
    async fn watch_responses(
        &self,
        page: &Page,
        capture: &Arc<CaptureState>,
        sniffer: &Arc<ManifestSniffer>,
    ) -> Result<JoinHandle<()>, ExtractorError> {
        let mut responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|error| ExtractorError::Launch(error.to_string()))?;
        let capture = capture.clone();
        let sniffer = sniffer.clone();
        let page = page.clone();

        Ok(tokio::spawn(async move {
            while let Some(event) = responses.next().await {
                if capture.manifest().is_some() {
                    continue;
                }
                let url = event.response.url.as_str();
                if !sniffer.is_relevant_response(url, &event.response.mime_type) {
                    continue;
                }
                let body = match page
                    .execute(GetResponseBodyParams::new(event.request_id.clone()))
                    .await
                {
                    Ok(body) => body,
                    Err(error) => {
                        debug!(%url, %error, "Response body unavailable");
                        continue;
                    }
                };
                if body.base64_encoded {
                    continue;
                }
                if let Some(found) = sniffer.scan_body(&body.body) {
                    if capture.record_manifest(found.clone()) {
                        info!(manifest = %found, source = %url, "Manifest URL found in response body");
                    }
                }
            }
        }))
    }

    /// Dismiss the consent dialog if it shows up within the wait window.
    /// Consent handling is best effort; the page may remember an earlier
    /// choice or present no dialog at all.
    async fn dismiss_consent(&self, page: &Page) {
        let deadline =
            tokio::time::Instant::now() + Duration::from_secs(self.config.consent_timeout_secs);
        loop {
            match page.find_element(self.config.consent_selector.as_str()).await {
                Ok(button) => {
                    match button.click().await {
                        Ok(_) => {
                            info!("Consent dialog dismissed");
                            // Let the overlay fade before traffic is trusted.
                            tokio::time::sleep(Duration::from_secs(1)).await;
                        }
                        Err(error) => warn!(%error, "Consent button found but click failed"),
                    }
                    return;
                }
                Err(_) => {
                    if tokio::time::Instant::now() >= deadline {
                        debug!("No consent dialog within the wait window");
                        return;
                    }
                    tokio::time::sleep(Duration::from_millis(250)).await;
                }
            }
        }
    }
}

fn flatten_headers(headers: &Headers) -> HashMap<String, String> {
    serde_json::to_value(headers)
        .map(header_map)
        .unwrap_or_default()
}

fn header_map(value: serde_json::Value) -> HashMap<String, String> {
    let mut map = HashMap::new();
    if let Some(object) = value.as_object() {
        for (name, value) in object {
            if let Some(value) = value.as_str() {
                map.insert(name.to_ascii_lowercase(), value.to_string());
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_map_lowercases_names() {
        let map = header_map(json!({
            "Cookie": "session=abc",
            "User-Agent": "UA",
            "X-Count": 3,
        }));
        assert_eq!(map.get("cookie"), Some(&"session=abc".to_string()));
        assert_eq!(map.get("user-agent"), Some(&"UA".to_string()));
        // Non-string values are dropped rather than stringified.
        assert!(!map.contains_key("x-count"));
    }

    #[test]
    fn test_header_map_non_object() {
        assert!(header_map(json!(null)).is_empty());
        assert!(header_map(json!(["a", "b"])).is_empty());
    }
}
