use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::anim::timeline::{REFRESH_HZ, ScrollState, ScrollTimeline};
use crate::audio::prepare::{AudioOutcome, prepare_audio};
use crate::capture::artifact::VideoArtifact;
use crate::config::{AudioSettings, ScrollConfig};
use crate::encode::format::{CodecProbe, ContainerFormat, FfmpegProbe, select_format};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::ReelResult;
use crate::layout::wrap::WrappedText;
use crate::render::frame::draw_frame;
use crate::render::surface::DrawSurface;

/// Captured frames per second.
pub const CAPTURE_FPS: u32 = 30;

/// Cooperative cancellation flag for a running capture.
///
/// Clones share the flag, so one can be moved to another thread or a signal handler.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the capture to finish after the frame in progress.
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Observable capture status.
#[derive(Clone, Debug, Default)]
pub struct CaptureState {
    /// A capture is in progress.
    pub is_recording: bool,
    /// Percent of the scroll distance captured, `0..=100`.
    pub progress: f64,
    /// Result of the last successful capture.
    pub artifact: Option<Arc<VideoArtifact>>,
    /// Host flag selecting the preview pane; captures do not read it.
    pub preview_mode: bool,
}

type AudioPreparer = Box<dyn Fn(&AudioSettings, f64) -> AudioOutcome>;

/// Renders a full scroll run frame by frame into a [`FrameSink`].
pub struct Recorder<P: CodecProbe = FfmpegProbe> {
    probe: P,
    state: CaptureState,
    stop: StopSignal,
    audio: Option<AudioOutcome>,
    prepare: AudioPreparer,
}

impl Recorder<FfmpegProbe> {
    /// Recorder probing the system `ffmpeg` for encoder support.
    pub fn with_ffmpeg() -> Self {
        Self::new(FfmpegProbe::detect())
    }
}

impl<P: CodecProbe> Recorder<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            state: CaptureState::default(),
            stop: StopSignal::new(),
            audio: None,
            prepare: Box::new(prepare_audio),
        }
    }

    /// Replace the audio preparation step.
    pub fn with_audio_preparer(
        mut self,
        prepare: impl Fn(&AudioSettings, f64) -> AudioOutcome + 'static,
    ) -> Self {
        self.prepare = Box::new(prepare);
        self
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Shared handle on this recorder's stop flag.
    pub fn stop_handle(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn set_preview_mode(&mut self, preview_mode: bool) {
        self.state.preview_mode = preview_mode;
    }

    /// Format the next capture will use.
    pub fn format(&self) -> ContainerFormat {
        select_format(&self.probe)
    }

    /// Capture a complete scroll run.
    ///
    /// Frames are rendered at [`CAPTURE_FPS`], each advancing the timeline by the display
    /// ticks one frame spans, so playback speed matches the preview. `on_progress` receives
    /// non-decreasing percentages ending at exactly 100 on success.
    ///
    /// Audio problems never fail the capture; they degrade to a video-only artifact.
    #[tracing::instrument(skip_all, fields(width = cfg.width, height = cfg.height))]
    pub fn start_recording(
        &mut self,
        surface: &mut dyn DrawSurface,
        cfg: &ScrollConfig,
        sink: &mut dyn FrameSink,
        mut on_progress: impl FnMut(f64),
    ) -> ReelResult<Arc<VideoArtifact>> {
        cfg.validate()?;
        self.release_audio();
        self.stop.reset();
        self.state.is_recording = true;
        self.state.progress = 0.0;
        self.state.artifact = None;

        let result = self.capture(surface, cfg, sink, &mut on_progress);
        self.release_audio();
        self.state.is_recording = false;

        let artifact = Arc::new(result?);
        self.state.progress = 100.0;
        on_progress(100.0);
        self.state.artifact = Some(artifact.clone());
        Ok(artifact)
    }

    /// Request the running capture to stop and release its audio resources.
    ///
    /// Idempotent; a no-op when nothing is recording.
    pub fn stop_recording(&mut self) {
        self.stop.request();
        self.release_audio();
    }

    fn release_audio(&mut self) {
        if let Some(mut audio) = self.audio.take() {
            audio.release();
        }
    }

    fn capture(
        &mut self,
        surface: &mut dyn DrawSurface,
        cfg: &ScrollConfig,
        sink: &mut dyn FrameSink,
        on_progress: &mut dyn FnMut(f64),
    ) -> ReelResult<VideoArtifact> {
        let format = self.format();

        surface.set_font_size(cfg.font_size as f32)?;
        let wrapped = WrappedText::layout(&mut *surface, cfg);
        let timeline = ScrollTimeline::new(cfg, &wrapped);

        let fps = Fps::new(CAPTURE_FPS, 1)?;
        let ticks_per_frame = REFRESH_HZ / fps.as_f64();
        let video_secs = fps.frames_to_secs(timeline.frames_to_complete(ticks_per_frame));

        let audio = self.prepare_audio_for(format, &cfg.audio, video_secs);
        let audio_input = audio.input().cloned();
        self.audio = Some(audio);

        tracing::debug!(
            mime = format.mime(),
            lines = wrapped.lines.len(),
            video_secs,
            audio = audio_input.is_some(),
            "capture started"
        );

        sink.begin(SinkConfig {
            width: cfg.width,
            height: cfg.height,
            fps,
            format,
            audio: audio_input,
        })?;

        let run = CaptureRun {
            cfg,
            wrapped: &wrapped,
            timeline: &timeline,
            ticks_per_frame,
        };
        let frames = match self.push_frames(&run, surface, sink, on_progress) {
            Ok(frames) => frames,
            Err(e) => {
                if let Err(end_err) = sink.end() {
                    tracing::debug!(error = %end_err, "encoder shutdown after failed capture");
                }
                return Err(e);
            }
        };

        let chunks = sink.end()?;
        tracing::debug!(frames, chunks = chunks.len(), "capture finished");
        Ok(VideoArtifact::from_chunks(chunks, format))
    }

    fn prepare_audio_for(
        &self,
        format: ContainerFormat,
        settings: &AudioSettings,
        video_secs: f64,
    ) -> AudioOutcome {
        let audio = if settings.wants_audio() && !self.probe.supports_audio(format) {
            AudioOutcome::VideoOnly {
                warning: Some(format!(
                    "audio encoder '{}' unavailable for {format}",
                    format.audio_encoder()
                )),
            }
        } else {
            (self.prepare)(settings, video_secs)
        };
        if let Some(warning) = audio.warning() {
            tracing::warn!(%warning, "recording without audio");
        }
        audio
    }

    /// Draw and push frames until the run completes, a stop is requested or the
    /// safety cutoff is reached. Returns the number of frames pushed.
    fn push_frames(
        &mut self,
        run: &CaptureRun<'_>,
        surface: &mut dyn DrawSurface,
        sink: &mut dyn FrameSink,
        on_progress: &mut dyn FnMut(f64),
    ) -> ReelResult<u64> {
        let CaptureRun {
            cfg,
            wrapped,
            timeline,
            ticks_per_frame,
        } = *run;
        let mut state = timeline.initial();
        let mut frames = 0u64;
        loop {
            draw_frame(surface, cfg, wrapped, state.scroll);
            let frame = surface.snapshot()?;
            sink.push_frame(FrameIndex(frames), &frame)?;
            frames += 1;

            let progress = timeline.progress(state).max(self.state.progress);
            self.state.progress = progress;
            on_progress(progress);

            if timeline.is_complete(state) {
                return Ok(frames);
            }
            if self.stop.is_requested() {
                tracing::debug!(frames, "capture stopped on request");
                return Ok(frames);
            }
            if past_cutoff(timeline, state) {
                tracing::warn!(frames, ticks = state.ticks, "capture hit the safety cutoff");
                return Ok(frames);
            }
            state = timeline.advance(state, ticks_per_frame).0;
        }
    }
}

/// Inputs shared by every frame of one capture.
#[derive(Clone, Copy)]
struct CaptureRun<'a> {
    cfg: &'a ScrollConfig,
    wrapped: &'a WrappedText,
    timeline: &'a ScrollTimeline,
    ticks_per_frame: f64,
}

/// Whether `state` has run for more than twice the timeline's nominal duration.
fn past_cutoff(timeline: &ScrollTimeline, state: ScrollState) -> bool {
    state.ticks >= 2.0 * timeline.duration_ticks()
}

#[cfg(test)]
#[path = "../../tests/unit/capture/recorder.rs"]
mod tests;
