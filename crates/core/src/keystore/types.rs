//! Types for the line-oriented credential store.

use std::path::PathBuf;
use thiserror::Error;

use super::validate::is_valid_credential_format;

/// One decryption credential, serialized as `KeyID:Key` on a single store
/// line. Parsing is deliberately lenient: anything the candidate gate lets
/// through is carried as-is, and strict format checking is a separate,
/// non-blocking step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    raw: String,
}

impl Credential {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The full `KeyID:Key` line as stored.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The KeyID half (text before the first separator).
    pub fn key_id(&self) -> &str {
        self.raw.split(':').next().unwrap_or("")
    }

    /// The raw key handed to the decrypt tool: the second `:`-separated
    /// field of the line.
    pub fn key(&self) -> &str {
        self.raw.splitn(3, ':').nth(1).unwrap_or("")
    }

    /// Strict `32-hex:32-hex` shape check. Advisory only; a failing
    /// credential is still attempted.
    pub fn is_well_formed(&self) -> bool {
        is_valid_credential_format(&self.raw)
    }
}

/// A repeated credential value found across distinct store lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCredential {
    /// 1-based line of the later occurrence.
    pub line: usize,
    /// 1-based line where the value first appeared.
    pub first_line: usize,
    /// The repeated value.
    pub value: String,
}

/// Errors for credential store access. A missing store file is not an
/// error; it simply yields no credentials.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("Failed to read credential store {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
