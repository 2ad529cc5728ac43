//! Episode catalog - the discovery cache and its external refresher.
//!
//! Discovery runs outside this process and writes a JSON snapshot of episode
//! descriptors. The orchestrator asks the collaborator to refresh that
//! snapshot, then reads it; the snapshot itself is never rewritten here.

mod cache;
mod discovery;
mod types;

pub use cache::DiscoveryCache;
pub use discovery::{CommandDiscovery, Discovery, DiscoveryConfig};
pub use types::*;
