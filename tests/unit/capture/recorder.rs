use super::*;
use crate::audio::decode::AudioPcm;
use crate::audio::prepare::prepare_audio_with;
use crate::encode::sink::InMemorySink;
use crate::foundation::error::ReelError;
use crate::render::surface::FrameRGBA;
use crate::test_support::RecordingSurface;
use std::cell::RefCell;
use std::rc::Rc;

struct Fixed(&'static [ContainerFormat]);

impl CodecProbe for Fixed {
    fn supports(&self, format: ContainerFormat) -> bool {
        self.0.contains(&format)
    }
}

struct VideoEncodersOnly;

impl CodecProbe for VideoEncodersOnly {
    fn supports(&self, format: ContainerFormat) -> bool {
        format == ContainerFormat::WebmVp9
    }

    fn supports_audio(&self, _format: ContainerFormat) -> bool {
        false
    }
}

#[derive(Default)]
struct FailingPush {
    pushed: usize,
    ended: bool,
}

impl FrameSink for FailingPush {
    fn begin(&mut self, _cfg: SinkConfig) -> ReelResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &FrameRGBA) -> ReelResult<()> {
        if self.pushed == 3 {
            return Err(ReelError::encode("broken pipe"));
        }
        self.pushed += 1;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<Vec<Vec<u8>>> {
        self.ended = true;
        Err(ReelError::encode("encoder exited early"))
    }
}

struct FailingEnd;

impl FrameSink for FailingEnd {
    fn begin(&mut self, _cfg: SinkConfig) -> ReelResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &FrameRGBA) -> ReelResult<()> {
        Ok(())
    }

    fn end(&mut self) -> ReelResult<Vec<Vec<u8>>> {
        Err(ReelError::encode("muxer refused"))
    }
}

fn cfg() -> ScrollConfig {
    // 3 lines of 20px => start -10, end 170, 10px per captured frame.
    ScrollConfig {
        text: "Hello world\n\nsecond paragraph".to_owned(),
        width: 200,
        height: 100,
        padding: 10.0,
        font_size: 10.0,
        line_height: 2.0,
        scroll_speed: 50.0,
        ..ScrollConfig::default()
    }
}

fn recorder() -> Recorder<Fixed> {
    Recorder::new(Fixed(&[ContainerFormat::WebmVp9, ContainerFormat::Mp4H264]))
}

#[test]
fn captures_whole_run_with_monotonic_progress() {
    let mut rec = recorder();
    let mut surface = RecordingSurface::new(200, 100);
    let mut sink = InMemorySink::new();
    let mut seen = Vec::new();

    let artifact = rec
        .start_recording(&mut surface, &cfg(), &mut sink, |p| seen.push(p))
        .unwrap();

    assert_eq!(sink.frames().len(), 19);
    assert_eq!(surface.snapshots, 19);
    for (i, (idx, _)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
    }
    let sink_cfg = sink.config().unwrap();
    assert_eq!(sink_cfg.fps, Fps::new(30, 1).unwrap());
    assert_eq!(sink_cfg.format, ContainerFormat::Mp4H264);
    assert!(sink_cfg.audio.is_none());

    assert_eq!(seen.first(), Some(&0.0));
    assert_eq!(seen.last(), Some(&100.0));
    assert!(seen.windows(2).all(|w| w[1] >= w[0]));

    assert_eq!(artifact.format, ContainerFormat::Mp4H264);
    assert_eq!(artifact.bytes.len(), 19 * 200 * 100 * 4);

    let state = rec.state();
    assert!(!state.is_recording);
    assert_eq!(state.progress, 100.0);
    assert!(Arc::ptr_eq(state.artifact.as_ref().unwrap(), &artifact));
}

#[test]
fn audio_enabled_without_clip_records_video_only() {
    let mut rec = recorder();
    let mut surface = RecordingSurface::new(200, 100);
    let mut sink = InMemorySink::new();
    let mut cfg = cfg();
    cfg.audio.enabled = true;

    rec.start_recording(&mut surface, &cfg, &mut sink, |_| {})
        .unwrap();
    assert!(sink.config().unwrap().audio.is_none());
}

#[test]
fn mixed_audio_is_passed_to_sink_and_released_after() {
    let mut rec = recorder().with_audio_preparer(|settings, secs| {
        prepare_audio_with(settings, secs, |_| {
            Ok(AudioPcm {
                sample_rate: 100,
                channels: 2,
                interleaved_f32: vec![0.5; 200],
            })
        })
    });
    let mut surface = RecordingSurface::new(200, 100);
    let mut sink = InMemorySink::new();
    let mut cfg = cfg();
    cfg.audio.enabled = true;
    cfg.audio.clip = Some("tone.wav".into());

    rec.start_recording(&mut surface, &cfg, &mut sink, |_| {})
        .unwrap();
    let audio = sink.config().unwrap().audio.expect("audio input");
    assert_eq!(audio.sample_rate, 100);
    assert!(!audio.path.exists());
}

#[test]
fn missing_audio_encoder_records_video_only() {
    let mut rec = Recorder::new(VideoEncodersOnly).with_audio_preparer(|settings, secs| {
        prepare_audio_with(settings, secs, |_| {
            Ok(AudioPcm {
                sample_rate: 100,
                channels: 2,
                interleaved_f32: vec![0.5; 200],
            })
        })
    });
    let mut surface = RecordingSurface::new(200, 100);
    let mut sink = InMemorySink::new();
    let mut cfg = cfg();
    cfg.audio.enabled = true;
    cfg.audio.clip = Some("tone.wav".into());

    let artifact = rec
        .start_recording(&mut surface, &cfg, &mut sink, |_| {})
        .unwrap();
    let sink_cfg = sink.config().unwrap();
    assert_eq!(sink_cfg.format, ContainerFormat::WebmVp9);
    assert!(sink_cfg.audio.is_none());
    assert_eq!(sink.frames().len(), 19);
    assert_eq!(artifact.format, ContainerFormat::WebmVp9);
}

#[test]
fn fast_scroll_still_draws_completion_frame() {
    let mut rec = recorder();
    let mut surface = RecordingSurface::new(200, 100);
    let mut sink = InMemorySink::new();
    let mut seen = Vec::new();
    let fast = ScrollConfig {
        scroll_speed: 100_000.0,
        ..cfg()
    };

    rec.start_recording(&mut surface, &fast, &mut sink, |p| seen.push(p))
        .unwrap();

    // The whole run fits in one frame step: first frame, then the clamped last one.
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(seen, vec![0.0, 100.0, 100.0]);
}

#[test]
fn cutoff_is_twice_the_nominal_duration() {
    let timeline = ScrollTimeline::from_parts(100.0, 60.0, 10.0, 50.0);
    // 180px at 5px per tick.
    assert_eq!(timeline.duration_ticks(), 36.0);

    let at = |ticks: f64| ScrollState {
        scroll: 170.0,
        ticks,
    };
    assert!(!past_cutoff(&timeline, timeline.initial()));
    assert!(!past_cutoff(&timeline, at(36.0)));
    assert!(!past_cutoff(&timeline, at(71.9)));
    assert!(past_cutoff(&timeline, at(72.0)));
}

#[test]
fn push_failure_shuts_down_encoder() {
    let mut rec = recorder();
    let mut surface = RecordingSurface::new(200, 100);
    let mut sink = FailingPush::default();

    let err = rec
        .start_recording(&mut surface, &cfg(), &mut sink, |_| {})
        .unwrap_err();
    assert!(err.to_string().contains("broken pipe"));
    assert_eq!(sink.pushed, 3);
    assert!(sink.ended);
    assert!(!rec.state().is_recording);
    assert!(rec.state().artifact.is_none());
}

#[test]
fn stop_signal_ends_capture_early_with_artifact() {
    let mut rec = recorder();
    let stop = rec.stop_handle();
    let mut surface = RecordingSurface::new(200, 100);
    let mut sink = InMemorySink::new();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let seen = calls.clone();

    let artifact = rec
        .start_recording(&mut surface, &cfg(), &mut sink, move |p| {
            seen.borrow_mut().push(p);
            if p > 20.0 {
                stop.request();
            }
        })
        .unwrap();

    // Frames at 0, 5.6, 11.1, 16.7, 22.2 percent; the fifth requests the stop.
    assert_eq!(sink.frames().len(), 5);
    assert!(sink.is_ended());
    assert_eq!(calls.borrow().last(), Some(&100.0));
    assert_eq!(artifact.bytes.len(), 5 * 200 * 100 * 4);

    // The next run clears the request.
    rec.start_recording(&mut surface, &cfg(), &mut sink, |_| {})
        .unwrap();
    assert_eq!(sink.frames().len(), 19);
}

#[test]
fn encoder_failure_is_returned_and_state_reset() {
    let mut rec = recorder();
    let mut surface = RecordingSurface::new(200, 100);
    let err = rec
        .start_recording(&mut surface, &cfg(), &mut FailingEnd, |_| {})
        .unwrap_err();
    assert!(matches!(err, ReelError::Encode(_)));
    assert!(err.to_string().contains("muxer refused"));
    assert!(!rec.state().is_recording);
    assert!(rec.state().artifact.is_none());
}

#[test]
fn unsupported_surface_fails_before_sink_begins() {
    let mut rec = recorder();
    let mut surface = RecordingSurface::new(200, 100);
    surface.fail_font = true;
    let mut sink = InMemorySink::new();

    let err = rec
        .start_recording(&mut surface, &cfg(), &mut sink, |_| {})
        .unwrap_err();
    assert!(matches!(err, ReelError::Surface(_)));
    assert!(sink.config().is_none());
    assert!(!rec.state().is_recording);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let mut rec = recorder();
    let mut surface = RecordingSurface::new(200, 100);
    let mut sink = InMemorySink::new();
    let bad = ScrollConfig {
        scroll_speed: -1.0,
        ..cfg()
    };
    assert!(matches!(
        rec.start_recording(&mut surface, &bad, &mut sink, |_| {}),
        Err(ReelError::Validation(_))
    ));
    assert_eq!(surface.snapshots, 0);
}

#[test]
fn falls_back_to_webm_without_supported_encoders() {
    let rec = Recorder::new(Fixed(&[]));
    assert_eq!(rec.format(), ContainerFormat::Webm);
}

#[test]
fn stop_recording_when_idle_is_harmless() {
    let mut rec = recorder();
    rec.stop_recording();
    rec.stop_recording();
    rec.set_preview_mode(true);
    assert!(rec.state().preview_mode);
    assert!(!rec.state().is_recording);
}
