use crate::audio::decode::AudioPcm;
use crate::config::AudioSettings;

/// Length of the linear fade-in and fade-out ramps.
pub const FADE_SECS: f64 = 2.0;

/// Gain applied over the clip's own playback time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GainEnvelope {
    /// Base gain in `[0, 1]`.
    pub volume: f32,
    /// Fade-in ramp length, `0` when disabled.
    pub fade_in_secs: f64,
    /// Fade-out ramp length, `0` when disabled or the clip is too short.
    pub fade_out_secs: f64,
    /// Clip length in seconds.
    pub clip_secs: f64,
}

impl GainEnvelope {
    /// Envelope for a clip of `clip_secs` under `settings`.
    ///
    /// Fade-out needs a clip longer than [`FADE_SECS`]; fade-in always applies when requested.
    pub fn new(settings: &AudioSettings, clip_secs: f64) -> Self {
        Self {
            volume: settings.gain(),
            fade_in_secs: if settings.fade_in { FADE_SECS } else { 0.0 },
            fade_out_secs: if settings.fade_out && clip_secs > FADE_SECS {
                FADE_SECS
            } else {
                0.0
            },
            clip_secs,
        }
    }

    /// Gain at `t` seconds into the clip.
    pub fn gain_at(&self, t: f64) -> f32 {
        let mut gain = self.volume;
        if self.fade_in_secs > 0.0 {
            gain *= (t / self.fade_in_secs).clamp(0.0, 1.0) as f32;
        }
        if self.fade_out_secs > 0.0 {
            let rem = (self.clip_secs - t).max(0.0);
            gain *= (rem / self.fade_out_secs).clamp(0.0, 1.0) as f32;
        }
        gain
    }
}

/// Place `pcm` on a silent track of `total_frames` sample frames, delayed by
/// `start_offset_secs` and shaped by `envelope`.
///
/// The output keeps `pcm`'s sample rate and channel layout; samples are clamped to `[-1, 1]`.
pub fn render_track(
    pcm: &AudioPcm,
    envelope: &GainEnvelope,
    start_offset_secs: f64,
    total_frames: u64,
) -> Vec<f32> {
    let channels = usize::from(pcm.channels);
    let mut out = vec![0.0f32; total_frames as usize * channels];
    if channels == 0 || pcm.sample_rate == 0 {
        return out;
    }

    let rate = f64::from(pcm.sample_rate);
    let offset_frames = (start_offset_secs.max(0.0) * rate).round() as u64;
    let src_frames = pcm.frames() as u64;

    for dst_frame in offset_frames..total_frames {
        let src_frame = dst_frame - offset_frames;
        if src_frame >= src_frames {
            break;
        }
        let gain = envelope.gain_at(src_frame as f64 / rate);
        let src = src_frame as usize * channels;
        let dst = dst_frame as usize * channels;
        for ch in 0..channels {
            out[dst + ch] = (pcm.interleaved_f32[src + ch] * gain).clamp(-1.0, 1.0);
        }
    }
    out
}

/// Sample frames covering `secs` at `sample_rate`, rounded up.
pub fn secs_to_sample_frames(secs: f64, sample_rate: u32) -> u64 {
    (secs.max(0.0) * f64::from(sample_rate)).ceil() as u64
}

#[cfg(test)]
#[path = "../../tests/unit/audio/track.rs"]
mod tests;
