//! scrollreel renders bottom-to-top scrolling text into video.
//!
//! The crate is organized around one immutable [`ScrollConfig`]:
//!
//! - Wrap the text into lines with [`WrappedText::layout`]
//! - Draw single frames with [`render_frame`] on any [`DrawSurface`]
//! - Preview the scroll with the tick-driven [`Animator`]
//! - Capture a full run into an MP4/WebM [`VideoArtifact`] with a [`Recorder`]
#![forbid(unsafe_code)]

mod foundation;

/// Scroll timeline and preview animation.
pub mod anim;
/// Background audio preparation.
pub mod audio;
/// Offline capture into encoded video.
pub mod capture;
/// Render configuration.
pub mod config;
/// Encoding sinks and container selection.
pub mod encode;
pub(crate) mod layout;
/// Drawing surfaces and frame rendering.
pub mod render;
pub(crate) mod text;

#[cfg(test)]
mod test_support;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rect, Rgba8};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::anim::driver::{AnimationState, Animator, FrameReport, run_paced, run_unpaced};
pub use crate::anim::timeline::{REFRESH_HZ, ScrollState, ScrollTimeline};
pub use crate::audio::prepare::{AudioOutcome, AudioResources, prepare_audio};
pub use crate::capture::artifact::VideoArtifact;
pub use crate::capture::recorder::{CAPTURE_FPS, CaptureState, Recorder, StopSignal};
pub use crate::config::{AudioSettings, Color, ScrollConfig, VIDEO_PRESETS, VideoPreset};
pub use crate::encode::ffmpeg::{FfmpegSink, is_ffmpeg_on_path};
pub use crate::encode::format::{CodecProbe, ContainerFormat, FfmpegProbe, select_format};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::layout::wrap::{TextMeasure, WrappedText, wrap_line, wrap_text};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::frame::{draw_frame, render_frame};
pub use crate::render::surface::{DrawSurface, FrameRGBA};
