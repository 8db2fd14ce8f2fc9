//! Offline capture of a full scroll run into an encoded video.

/// Encoded video result and file naming.
pub mod artifact;
/// Frame-by-frame capture loop.
pub mod recorder;
