//! Write-once capture registers shared between observation channels.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Facts observed from browser traffic during one extraction session.
///
/// Both observation channels race to fill these registers; the first writer
/// of each fact wins and later observations are ignored. Channels never
/// clear or overwrite a register, so a read that returns a value stays
/// valid for the rest of the session.
#[derive(Debug, Default)]
pub struct CaptureState {
    manifest_url: OnceLock<String>,
    headers: OnceLock<HashMap<String, String>>,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a manifest URL. Returns true when this call was the first.
    pub fn record_manifest(&self, url: impl Into<String>) -> bool {
        self.manifest_url.set(url.into()).is_ok()
    }

    pub fn manifest(&self) -> Option<&str> {
        self.manifest_url.get().map(String::as_str)
    }

    /// Record request headers, keyed by lowercased header name. Returns
    /// true when this call was the first.
    pub fn record_headers(&self, headers: HashMap<String, String>) -> bool {
        self.headers.set(headers).is_ok()
    }

    pub fn headers_recorded(&self) -> bool {
        self.headers.get().is_some()
    }

    /// Cookie header from the recorded request, if any was present.
    pub fn cookie(&self) -> Option<&str> {
        self.headers
            .get()
            .and_then(|headers| headers.get("cookie"))
            .map(String::as_str)
    }
}
