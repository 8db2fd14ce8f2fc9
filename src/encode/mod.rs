//! Encoding sinks and container selection.
//!
//! Sinks consume captured frames in order and return the encoded container as chunks.

/// `ffmpeg`-based sink streaming MP4/WebM through pipes.
pub mod ffmpeg;
/// Container formats and encoder capability probing.
pub mod format;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
