//! Credential store - decryption keys, one line per episode.
//!
//! # Features
//!
//! - 1-indexed lookup by episode number, blank lines counted
//! - Lenient candidate gate (strict format checking is advisory only)
//! - Duplicate detection across the whole store
//!
//! The store file is owned by the human operator; this module only reads it.

mod store;
mod types;
mod validate;

pub use store::KeyStore;
pub use types::{Credential, DuplicateCredential, KeyStoreError};
pub use validate::is_valid_credential_format;
