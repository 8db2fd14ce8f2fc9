use std::collections::BTreeSet;

/// Container/codec combination an artifact is encoded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    /// MP4 with H.264 video.
    Mp4H264,
    /// MP4 with the muxer's default video codec.
    Mp4,
    /// WebM with VP9 video.
    WebmVp9,
    /// WebM with VP8 video.
    WebmVp8,
    /// WebM with the muxer's default video codec.
    Webm,
}

/// Formats in order of preference; the last entry is the unconditional fallback.
pub const PREFERENCE: [ContainerFormat; 5] = [
    ContainerFormat::Mp4H264,
    ContainerFormat::Mp4,
    ContainerFormat::WebmVp9,
    ContainerFormat::WebmVp8,
    ContainerFormat::Webm,
];

impl ContainerFormat {
    /// MIME type, with a `codecs` parameter for the codec-specific variants.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Mp4H264 => "video/mp4;codecs=h264",
            Self::Mp4 => "video/mp4",
            Self::WebmVp9 => "video/webm;codecs=vp9",
            Self::WebmVp8 => "video/webm;codecs=vp8",
            Self::Webm => "video/webm",
        }
    }

    pub fn is_mp4(self) -> bool {
        matches!(self, Self::Mp4H264 | Self::Mp4)
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        if self.is_mp4() { "mp4" } else { "webm" }
    }

    /// `ffmpeg` muxer name (`-f`).
    pub fn muxer(self) -> &'static str {
        self.extension()
    }

    /// `ffmpeg` video encoder name (`-c:v`).
    pub fn video_encoder(self) -> &'static str {
        match self {
            Self::Mp4H264 => "libx264",
            Self::Mp4 => "mpeg4",
            Self::WebmVp9 => "libvpx-vp9",
            Self::WebmVp8 | Self::Webm => "libvpx",
        }
    }

    /// `ffmpeg` audio encoder name (`-c:a`).
    pub fn audio_encoder(self) -> &'static str {
        if self.is_mp4() { "aac" } else { "libopus" }
    }
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime())
    }
}

/// Answers whether the encoding backend can produce a format.
pub trait CodecProbe {
    /// Whether the video encoder for `format` is available.
    fn supports(&self, format: ContainerFormat) -> bool;

    /// Whether an audio track can be muxed into `format`.
    fn supports_audio(&self, _format: ContainerFormat) -> bool {
        true
    }
}

/// Return the first supported format in [`PREFERENCE`], falling back to [`ContainerFormat::Webm`].
pub fn select_format(probe: &dyn CodecProbe) -> ContainerFormat {
    let format = PREFERENCE
        .iter()
        .copied()
        .find(|&f| probe.supports(f))
        .unwrap_or(ContainerFormat::Webm);
    tracing::debug!(mime = format.mime(), "container format selected");
    format
}

/// Probe backed by the encoder list of the system `ffmpeg`, queried once at construction.
#[derive(Clone, Debug, Default)]
pub struct FfmpegProbe {
    encoders: BTreeSet<String>,
}

impl FfmpegProbe {
    /// Run `ffmpeg -hide_banner -encoders`. A missing or failing `ffmpeg` yields an empty list.
    pub fn detect() -> Self {
        let out = std::process::Command::new("ffmpeg")
            .args(["-hide_banner", "-encoders"])
            .stdin(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .output();
        match out {
            Ok(out) if out.status.success() => {
                Self::from_listing(&String::from_utf8_lossy(&out.stdout))
            }
            Ok(out) => {
                tracing::debug!(status = %out.status, "ffmpeg -encoders failed");
                Self::default()
            }
            Err(e) => {
                tracing::debug!(error = %e, "ffmpeg not available for codec probing");
                Self::default()
            }
        }
    }

    /// Parse the table printed by `ffmpeg -encoders`.
    ///
    /// Rows follow a `------` separator line and start with a flags column, then the encoder
    /// name.
    pub fn from_listing(listing: &str) -> Self {
        let encoders = listing
            .lines()
            .skip_while(|l| !l.trim_start().starts_with("---"))
            .skip(1)
            .filter_map(|l| {
                let mut cols = l.split_whitespace();
                let _flags = cols.next()?;
                cols.next().map(str::to_owned)
            })
            .collect();
        Self { encoders }
    }

    /// Whether `ffmpeg` lists encoder `name`.
    pub fn has_encoder(&self, name: &str) -> bool {
        self.encoders.contains(name)
    }
}

impl CodecProbe for FfmpegProbe {
    fn supports(&self, format: ContainerFormat) -> bool {
        self.has_encoder(format.video_encoder())
    }

    fn supports_audio(&self, format: ContainerFormat) -> bool {
        self.has_encoder(format.audio_encoder())
    }
}
