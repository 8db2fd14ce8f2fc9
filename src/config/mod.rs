//! Render configuration.
//!
//! A [`ScrollConfig`] is an immutable snapshot consumed read-only by layout, rendering and
//! capture. JSON input is merged over [`ScrollConfig::default`], so partial files are valid.

mod color;

pub use color::Color;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};

/// Font families offered as named choices by hosts.
pub const FONT_FAMILIES: [&str; 5] = [
    "Arial",
    "Georgia",
    "Times New Roman",
    "Helvetica",
    "Verdana",
];

/// Named canvas size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoPreset {
    /// Display name.
    pub name: &'static str,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Built-in canvas presets.
pub const VIDEO_PRESETS: [VideoPreset; 3] = [
    VideoPreset {
        name: "1080p",
        width: 1920,
        height: 1080,
    },
    VideoPreset {
        name: "720p",
        width: 1280,
        height: 720,
    },
    VideoPreset {
        name: "Vertical",
        width: 1080,
        height: 1920,
    },
];

const DEFAULT_TEXT: &str = "Enter your article text here...\n\nThis is a sample text that will scroll from bottom to top in the video.\n\nYou can customize the font size, scroll speed, and other settings to create your perfect text video.";

/// Full render configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Text to scroll. Lines are separated by `\n`.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Line height as a multiple of `font_size`.
    pub line_height: f64,
    /// Preferred family name inside `font_path` (first family when unmatched).
    pub font_family: String,
    /// Font file (TTF/OTF/TTC) used for shaping and rasterization.
    pub font_path: Option<PathBuf>,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Background fill.
    pub background_color: Color,
    /// Text fill (also used for the padding guide).
    pub text_color: Color,
    /// Inset of the content area on every side, in pixels.
    pub padding: f64,
    /// Scroll speed; the offset advances `scroll_speed / 10` pixels per display tick.
    pub scroll_speed: f64,
    /// Audio track settings.
    pub audio: AudioSettings,
}

/// Optional background audio.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioSettings {
    /// Whether audio should be mixed into captures.
    pub enabled: bool,
    /// Source clip; any format `ffmpeg` can decode.
    pub clip: Option<PathBuf>,
    /// Volume in percent, `0..=100`.
    pub volume: f64,
    /// Delay before the clip starts, in seconds.
    pub start_time_sec: f64,
    /// Linear fade-in over the first two seconds of the clip.
    pub fade_in: bool,
    /// Linear fade-out over the last two seconds of the clip.
    pub fade_out: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_owned(),
            font_size: 32.0,
            line_height: 1.3,
            font_family: FONT_FAMILIES[0].to_owned(),
            font_path: None,
            width: 640,
            height: 400,
            background_color: Color::rgb(0, 0, 0),
            text_color: Color::rgb(255, 255, 255),
            padding: 20.0,
            scroll_speed: 20.0,
            audio: AudioSettings::default(),
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            clip: None,
            volume: 50.0,
            start_time_sec: 0.0,
            fade_in: false,
            fade_out: false,
        }
    }
}

impl ScrollConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        serde_json::from_str(s).map_err(|e| ReelError::serde(e.to_string()))
    }

    /// Load a configuration from a JSON file.
    ///
    /// A relative `font_path` or `audio.clip` is resolved against the file's directory.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        use anyhow::Context as _;

        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&s)?;
        if let Some(root) = path.parent() {
            cfg.resolve_paths(root);
        }
        Ok(cfg)
    }

    /// Pretty JSON form.
    pub fn to_json_pretty(&self) -> ReelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReelError::serde(e.to_string()))
    }

    /// Return a copy sized to `preset`.
    pub fn with_preset(mut self, preset: VideoPreset) -> Self {
        self.width = preset.width;
        self.height = preset.height;
        self
    }

    /// Look up a preset by case-insensitive name.
    pub fn preset(name: &str) -> Option<VideoPreset> {
        VIDEO_PRESETS
            .iter()
            .copied()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Canvas dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Width of the padded content area.
    pub fn content_width(&self) -> f64 {
        f64::from(self.width) - self.padding * 2.0
    }

    /// Height of the padded content area.
    pub fn content_height(&self) -> f64 {
        f64::from(self.height) - self.padding * 2.0
    }

    /// Distance between the tops of consecutive wrapped lines.
    pub fn line_spacing(&self) -> f64 {
        self.font_size * self.line_height
    }

    /// Check every numeric field before a run starts.
    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("width/height must be non-zero"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(ReelError::validation(format!(
                "width/height must be <= {}",
                u16::MAX
            )));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ReelError::validation("font_size must be finite and > 0"));
        }
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            return Err(ReelError::validation("line_height must be finite and > 0"));
        }
        if !self.scroll_speed.is_finite() || self.scroll_speed <= 0.0 {
            return Err(ReelError::validation("scroll_speed must be finite and > 0"));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(ReelError::validation("padding must be finite and >= 0"));
        }
        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return Err(ReelError::validation(
                "padding leaves no content area inside the canvas",
            ));
        }
        self.audio.validate()
    }

    fn resolve_paths(&mut self, root: &Path) {
        if let Some(p) = self.font_path.as_mut()
            && p.is_relative()
        {
            *p = root.join(&*p);
        }
        if let Some(p) = self.audio.clip.as_mut()
            && p.is_relative()
        {
            *p = root.join(&*p);
        }
    }
}

impl AudioSettings {
    /// Whether a capture should try to mix audio at all.
    pub fn wants_audio(&self) -> bool {
        self.enabled && self.clip.is_some()
    }

    /// Gain factor in `[0, 1]`.
    pub fn gain(&self) -> f32 {
        (self.volume / 100.0).clamp(0.0, 1.0) as f32
    }

    fn validate(&self) -> ReelResult<()> {
        if !self.volume.is_finite() || !(0.0..=100.0).contains(&self.volume) {
            return Err(ReelError::validation("audio.volume must be within 0..=100"));
        }
        if !self.start_time_sec.is_finite() || self.start_time_sec < 0.0 {
            return Err(ReelError::validation(
                "audio.start_time_sec must be finite and >= 0",
            ));
        }
        Ok(())
    }
}
