//! Credential format validation.

use regex_lite::Regex;

const CREDENTIAL_PATTERN: &str = r"^[0-9a-fA-F]{32}:[0-9a-fA-F]{32}$";

/// Check the strict `KeyID:Key` shape: exactly 32 hex characters, a colon,
/// and exactly 32 hex characters, case-insensitive. Surrounding whitespace
/// is ignored. This never blocks a credential from being used; callers only
/// warn on a mismatch.
pub fn is_valid_credential_format(raw: &str) -> bool {
    Regex::new(CREDENTIAL_PATTERN)
        .map(|re| re.is_match(raw.trim()))
        .unwrap_or(false)
}
