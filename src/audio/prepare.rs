use std::path::{Path, PathBuf};

use crate::audio::decode::{AudioPcm, MIX_SAMPLE_RATE, decode_clip};
use crate::audio::track::{GainEnvelope, render_track, secs_to_sample_frames};
use crate::config::AudioSettings;
use crate::encode::sink::AudioInputConfig;
use crate::foundation::error::{ReelError, ReelResult};

/// Temporary files backing a mixed audio track.
///
/// Released on [`AudioResources::release`] or drop, whichever comes first.
#[derive(Debug, Default)]
pub struct AudioResources {
    path: Option<PathBuf>,
}

impl AudioResources {
    fn holding(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Delete the backing file. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(path) = self.path.take()
            && let Err(e) = std::fs::remove_file(&path)
        {
            tracing::debug!(path = %path.display(), error = %e, "audio temp file already gone");
        }
    }
}

impl Drop for AudioResources {
    fn drop(&mut self) {
        self.release();
    }
}

/// Result of preparing the audio track for a capture.
#[derive(Debug)]
pub enum AudioOutcome {
    /// A mixed track is ready to be muxed with the video.
    Mixed {
        /// Raw PCM input for the encoder.
        input: AudioInputConfig,
        /// Owner of the PCM file.
        resources: AudioResources,
    },
    /// Capture proceeds without audio.
    VideoOnly {
        /// Why audio was dropped, when it was requested but failed.
        warning: Option<String>,
    },
}

impl AudioOutcome {
    /// Encoder audio input, if a track was mixed.
    pub fn input(&self) -> Option<&AudioInputConfig> {
        match self {
            Self::Mixed { input, .. } => Some(input),
            Self::VideoOnly { .. } => None,
        }
    }

    /// Non-fatal warning explaining a fallback.
    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Mixed { .. } => None,
            Self::VideoOnly { warning } => warning.as_deref(),
        }
    }

    /// Release any held resources now.
    pub fn release(&mut self) {
        if let Self::Mixed { resources, .. } = self {
            resources.release();
        }
    }
}

/// Build the audio track for a capture of `video_secs`, decoding the clip with `ffmpeg`.
pub fn prepare_audio(settings: &AudioSettings, video_secs: f64) -> AudioOutcome {
    prepare_audio_with(settings, video_secs, |path| {
        decode_clip(path, MIX_SAMPLE_RATE)
    })
}

/// [`prepare_audio`] with a caller-supplied decoder.
///
/// Disabled audio or a missing clip yields `VideoOnly` without a warning; any decode or write
/// failure yields `VideoOnly` with the error text as warning.
pub fn prepare_audio_with(
    settings: &AudioSettings,
    video_secs: f64,
    decode: impl FnOnce(&Path) -> ReelResult<AudioPcm>,
) -> AudioOutcome {
    let Some(clip) = settings.clip.as_deref().filter(|_| settings.wants_audio()) else {
        return AudioOutcome::VideoOnly { warning: None };
    };

    match build_track(settings, clip, video_secs, decode) {
        Ok((input, resources)) => AudioOutcome::Mixed { input, resources },
        Err(e) => {
            tracing::warn!(clip = %clip.display(), error = %e, "audio failed; capturing video only");
            AudioOutcome::VideoOnly {
                warning: Some(e.to_string()),
            }
        }
    }
}

fn build_track(
    settings: &AudioSettings,
    clip: &Path,
    video_secs: f64,
    decode: impl FnOnce(&Path) -> ReelResult<AudioPcm>,
) -> ReelResult<(AudioInputConfig, AudioResources)> {
    let pcm = decode(clip)?;
    if pcm.channels == 0 || pcm.sample_rate == 0 {
        return Err(ReelError::audio("decoded audio has no channels or sample rate"));
    }

    let envelope = GainEnvelope::new(settings, pcm.duration_secs());
    let total_frames = secs_to_sample_frames(video_secs, pcm.sample_rate);
    let track = render_track(&pcm, &envelope, settings.start_time_sec, total_frames);

    let path = temp_track_path();
    let resources = AudioResources::holding(path.clone());
    write_f32le_file(&track, &path)?;
    tracing::debug!(
        path = %path.display(),
        clip_secs = pcm.duration_secs(),
        video_secs,
        "audio track mixed"
    );

    Ok((
        AudioInputConfig {
            path,
            sample_rate: pcm.sample_rate,
            channels: pcm.channels,
        },
        resources,
    ))
}

fn temp_track_path() -> PathBuf {
    std::env::temp_dir().join(format!(
        "scrollreel_audio_{}_{}.f32le",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
fn write_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> ReelResult<()> {
    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::audio(format!(
            "failed to write mixed audio file '{}': {e}",
            out_path.display()
        ))
    })
}
