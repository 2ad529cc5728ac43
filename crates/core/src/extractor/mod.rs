//! Manifest extraction through an observed browser session.
//!
//! The platform's player fetches a DASH manifest whose URL cannot be derived
//! offline, so extraction watches a real browser load the episode page and
//! captures the URL from its traffic. The session itself runs in a separate
//! process per episode.
//!
//! # Features
//!
//! - Two observation channels (request URLs and response bodies) feeding
//!   write-once capture registers
//! - Ordered, pluggable body detectors with a deny list for ad networks
//! - Session cookie and page title capture for downstream stages
//! - Subprocess isolation with a parent-side timeout guard

mod capture;
mod config;
mod detect;
mod error;
mod session;
mod subprocess;
mod traits;
mod types;

pub use capture::CaptureState;
pub use config::ExtractionConfig;
pub use detect::{BareUrlDetector, BodyDetector, Candidate, ManifestSniffer, SrcAttributeDetector};
pub use error::ExtractorError;
pub use session::BrowserSession;
pub use subprocess::{SubprocessExtractor, EXTRACTOR_BINARY_NAME};
pub use traits::ManifestExtractor;
pub use types::ExtractionResult;
