//! Published episode library.

mod config;
mod error;
mod store;

pub use config::LibraryConfig;
pub use error::LibraryError;
pub use store::Library;
