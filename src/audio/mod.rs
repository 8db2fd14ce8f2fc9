//! Background audio: decode, gain envelope, and capture-time preparation.

/// `ffmpeg`-based clip decoding.
pub mod decode;
/// Audio preparation with video-only fallback.
pub mod prepare;
/// Gain envelope and track rendering.
pub mod track;
