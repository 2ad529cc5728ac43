//! Stream decryption and merging via ffmpeg.
//!
//! Fetched streams arrive DRM-protected. Decryption applies the content key
//! while stream-copying, so no transcode happens anywhere in the pipeline;
//! the final merge muxes the two clear streams into one container the same
//! way.

mod config;
mod error;
mod ffmpeg;
mod traits;

pub use config::DecryptorConfig;
pub use error::DecryptorError;
pub use ffmpeg::FfmpegDecryptor;
pub use traits::StreamDecryptor;
