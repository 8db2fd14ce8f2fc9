use std::path::Path;

use crate::config::ScrollConfig;
use crate::foundation::core::{Canvas, Rect, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::wrap::TextMeasure;
use crate::render::surface::{DrawSurface, FrameRGBA};
use crate::text::engine::TextEngine;

/// CPU raster surface powered by `vello_cpu`, with `parley` shaping for text.
///
/// A surface without a font can still clear and stroke, but [`DrawSurface::set_font_size`]
/// fails with [`ReelError::Surface`], which aborts any animation or capture before its first
/// frame.
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    text: Option<TextEngine>,
}

impl CpuSurface {
    /// Create a surface of `canvas` size without a font.
    pub fn new(canvas: Canvas) -> ReelResult<Self> {
        let (width, height) = canvas.to_u16()?;
        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
            text: None,
        })
    }

    /// Attach a font from raw TTF/OTF/TTC bytes.
    pub fn with_font(mut self, font_bytes: Vec<u8>, family: Option<&str>) -> ReelResult<Self> {
        self.text = Some(TextEngine::new(font_bytes, family)?);
        Ok(self)
    }

    /// Attach the font file at `path`.
    pub fn with_font_file(self, path: &Path, family: Option<&str>) -> ReelResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ReelError::surface(format!("failed to read font '{}': {e}", path.display()))
        })?;
        self.with_font(bytes, family)
    }

    /// Surface sized to `cfg`, with `cfg.font_path` loaded when set.
    pub fn for_config(cfg: &ScrollConfig) -> ReelResult<Self> {
        let surface = Self::new(cfg.canvas())?;
        match cfg.font_path.as_deref() {
            Some(path) => surface.with_font_file(path, Some(&cfg.font_family)),
            None => Ok(surface),
        }
    }

    /// Family name selected from the loaded font, if any.
    pub fn family_name(&self) -> Option<&str> {
        self.text.as_ref().map(TextEngine::family_name)
    }

    fn fill_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(x0, y0, x1, y1));
    }
}

impl TextMeasure for CpuSurface {
    fn measure(&mut self, text: &str) -> f32 {
        self.text.as_mut().map_or(0.0, |t| t.measure(text))
    }
}

impl DrawSurface for CpuSurface {
    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn set_font_size(&mut self, size_px: f32) -> ReelResult<()> {
        let Some(text) = self.text.as_mut() else {
            return Err(ReelError::surface("no font loaded on the drawing surface"));
        };
        text.set_size_px(size_px)
    }

    fn clear(&mut self, color: Rgba8) {
        self.ctx.reset();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.fill_rect(0.0, 0.0, f64::from(self.width), f64::from(self.height));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba8, line_width: f64) {
        let half = line_width.max(0.0) / 2.0;
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));

        // Top and bottom span the corners; the sides fill in between so corners are not
        // blended twice.
        let (outer_x0, outer_x1) = (rect.x0 - half, rect.x1 + half);
        self.fill_rect(outer_x0, rect.y0 - half, outer_x1, rect.y0 + half);
        self.fill_rect(outer_x0, rect.y1 - half, outer_x1, rect.y1 + half);
        self.fill_rect(rect.x0 - half, rect.y0 + half, rect.x0 + half, rect.y1 - half);
        self.fill_rect(rect.x1 - half, rect.y0 + half, rect.x1 + half, rect.y1 - half);
    }

    fn fill_text_centered(&mut self, text: &str, center_x: f64, top_y: f64, color: Rgba8) {
        if text.is_empty() {
            return;
        }
        let Some(engine) = self.text.as_mut() else {
            return;
        };
        let layout = engine.shape(text);

        let x = center_x - f64::from(layout.width()) / 2.0;
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((x, top_y)));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let face = run.run();
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(face.font())
                    .font_size(face.font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    fn snapshot(&mut self) -> ReelResult<FrameRGBA> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}
