//! Image transform capability.
//!
//! Pure with respect to job state: callers decide what a failure means.

pub mod error;
pub mod transcode;

pub use error::{MediaError, MediaResult};
pub use transcode::{extension_for, Transcoder, DEFAULT_JPEG_QUALITY, DEFAULT_TARGET_WIDTH};
