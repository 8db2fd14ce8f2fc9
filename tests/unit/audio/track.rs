use super::*;

fn settings(fade_in: bool, fade_out: bool) -> AudioSettings {
    AudioSettings {
        enabled: true,
        volume: 100.0,
        fade_in,
        fade_out,
        ..AudioSettings::default()
    }
}

fn constant_pcm(rate: u32, secs: f64, value: f32) -> AudioPcm {
    let frames = (f64::from(rate) * secs) as usize;
    AudioPcm {
        sample_rate: rate,
        channels: 2,
        interleaved_f32: vec![value; frames * 2],
    }
}

#[test]
fn volume_scales_gain() {
    let env = GainEnvelope::new(
        &AudioSettings {
            volume: 25.0,
            ..settings(false, false)
        },
        10.0,
    );
    assert!((env.gain_at(0.0) - 0.25).abs() < 1e-6);
    assert!((env.gain_at(9.0) - 0.25).abs() < 1e-6);
}

#[test]
fn fade_in_ramps_over_two_seconds() {
    let env = GainEnvelope::new(&settings(true, false), 10.0);
    assert_eq!(env.gain_at(0.0), 0.0);
    assert!((env.gain_at(1.0) - 0.5).abs() < 1e-6);
    assert_eq!(env.gain_at(2.0), 1.0);
    assert_eq!(env.gain_at(5.0), 1.0);
}

#[test]
fn fade_out_ramps_over_last_two_seconds() {
    let env = GainEnvelope::new(&settings(false, true), 10.0);
    assert_eq!(env.gain_at(7.0), 1.0);
    assert!((env.gain_at(9.0) - 0.5).abs() < 1e-6);
    assert_eq!(env.gain_at(10.0), 0.0);
}

#[test]
fn fade_out_is_skipped_for_short_clips_but_fade_in_applies() {
    let env = GainEnvelope::new(&settings(true, true), 1.5);
    assert_eq!(env.fade_out_secs, 0.0);
    assert_eq!(env.fade_in_secs, FADE_SECS);
    assert!((env.gain_at(1.0) - 0.5).abs() < 1e-6);
    assert!((env.gain_at(1.5) - 0.75).abs() < 1e-6);
}

#[test]
fn track_is_delayed_by_start_offset() {
    let pcm = constant_pcm(10, 1.0, 0.5);
    let env = GainEnvelope::new(&settings(false, false), pcm.duration_secs());
    let out = render_track(&pcm, &env, 0.5, 20);

    assert_eq!(out.len(), 40);
    // First 5 frames are silent, then 10 frames of clip, then silence again.
    assert!(out[..10].iter().all(|s| *s == 0.0));
    assert!(out[10..30].iter().all(|s| (*s - 0.5).abs() < 1e-6));
    assert!(out[30..].iter().all(|s| *s == 0.0));
}

#[test]
fn track_is_truncated_to_video_length() {
    let pcm = constant_pcm(10, 5.0, 0.5);
    let env = GainEnvelope::new(&settings(false, false), pcm.duration_secs());
    let out = render_track(&pcm, &env, 0.0, 8);
    assert_eq!(out.len(), 16);
    assert!(out.iter().all(|s| (*s - 0.5).abs() < 1e-6));
}

#[test]
fn samples_are_clamped() {
    let pcm = constant_pcm(10, 1.0, 3.0);
    let env = GainEnvelope::new(&settings(false, false), pcm.duration_secs());
    let out = render_track(&pcm, &env, 0.0, 10);
    assert!(out.iter().all(|s| *s == 1.0));
}

#[test]
fn sample_frames_round_up() {
    assert_eq!(secs_to_sample_frames(1.0, 48_000), 48_000);
    assert_eq!(secs_to_sample_frames(1.0 / 3.0, 10), 4);
    assert_eq!(secs_to_sample_frames(-1.0, 10), 0);
}
