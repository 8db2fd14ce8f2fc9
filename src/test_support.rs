//! Test doubles shared by unit tests.

use crate::foundation::core::{Rect, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::wrap::TextMeasure;
use crate::render::surface::{DrawSurface, FrameRGBA};

/// Recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawOp {
    Clear(Rgba8),
    Stroke {
        rect: Rect,
        color: Rgba8,
        line_width: f64,
    },
    Text {
        text: String,
        center_x: f64,
        top_y: f64,
        color: Rgba8,
    },
}

/// Surface that records draw calls since the last clear.
///
/// Glyphs are `0.5 * font_size` wide, so measuring needs no font files.
pub(crate) struct RecordingSurface {
    width: u32,
    height: u32,
    font_size: Option<f32>,
    ops: Vec<DrawOp>,
    pub(crate) snapshots: usize,
    pub(crate) fail_font: bool,
}

impl RecordingSurface {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            font_size: None,
            ops: Vec::new(),
            snapshots: 0,
            fail_font: false,
        }
    }

    pub(crate) fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// `(text, center_x, top_y)` of every text draw in the current frame.
    pub(crate) fn texts(&self) -> Vec<(String, f64, f64)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text {
                    text,
                    center_x,
                    top_y,
                    ..
                } => Some((text.clone(), *center_x, *top_y)),
                _ => None,
            })
            .collect()
    }
}

impl TextMeasure for RecordingSurface {
    fn measure(&mut self, text: &str) -> f32 {
        text.chars().count() as f32 * self.font_size.unwrap_or(0.0) * 0.5
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_font_size(&mut self, size_px: f32) -> ReelResult<()> {
        if self.fail_font {
            return Err(ReelError::surface("recording surface has no font"));
        }
        self.font_size = Some(size_px);
        Ok(())
    }

    fn clear(&mut self, color: Rgba8) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear(color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba8, line_width: f64) {
        self.ops.push(DrawOp::Stroke {
            rect,
            color,
            line_width,
        });
    }

    fn fill_text_centered(&mut self, text: &str, center_x: f64, top_y: f64, color: Rgba8) {
        self.ops.push(DrawOp::Text {
            text: text.to_owned(),
            center_x,
            top_y,
            color,
        });
    }

    fn snapshot(&mut self) -> ReelResult<FrameRGBA> {
        self.snapshots += 1;
        let bg = self
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Clear(c) => Some(c.to_premul_array()),
                _ => None,
            })
            .unwrap_or([0, 0, 0, 0]);
        let px = (self.width as usize) * (self.height as usize);
        Ok(FrameRGBA {
            width: self.width,
            height: self.height,
            data: bg.repeat(px),
            premultiplied: true,
        })
    }
}
