//! Key resolution - static store lookup with an interactive fallback.
//!
//! # Features
//!
//! - Static path: the store already holds a candidate for the episode line
//! - Manual path: operator browser + numbered instructions + blocking gate,
//!   then a fresh reread of the same line
//! - Non-blocking format validation on whatever gets resolved
//!
//! # Example
//!
//! ```ignore
//! let store = KeyStore::new("keys.txt");
//! let manual = ManualCapture::new(config.resolver.clone(), Arc::new(StdinPrompt));
//! let resolver = KeyResolver::new(store, manual);
//!
//! let static_credential = resolver.check_static(episode.episode).await?;
//! match resolver.resolve(&episode, static_credential).await? {
//!     KeyResolution::Resolved { credential, .. } => { /* decrypt with it */ }
//!     KeyResolution::Skipped { expected_line } => { /* next episode */ }
//! }
//! ```

mod config;
mod manual;
mod prompt;
mod strategy;

pub use config::ResolverConfig;
pub use manual::ManualCapture;
pub use prompt::{OperatorPrompt, StdinPrompt};
pub use strategy::{KeyResolution, KeyResolver, KeySource};

use thiserror::Error;

/// Errors for the key resolution flow.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error(transparent)]
    Store(#[from] crate::keystore::KeyStoreError),

    #[error("Operator prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}
