use crate::foundation::core::{Rect, Rgba8};
use crate::foundation::error::ReelResult;
use crate::foundation::math::{flatten_premul_over_bg_to_opaque_rgba8, premul_rgba8};
use crate::layout::wrap::TextMeasure;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Opaque straight RGBA8 bytes, compositing over `bg` when the frame has alpha.
    pub fn to_opaque_rgba8(&self, bg: Rgba8) -> ReelResult<Vec<u8>> {
        let mut out = vec![0u8; self.data.len()];
        if self.premultiplied {
            flatten_premul_over_bg_to_opaque_rgba8(&mut out, &self.data, bg.to_array())?;
        } else {
            let premul: Vec<u8> = self
                .data
                .chunks_exact(4)
                .flat_map(|px| premul_rgba8([px[0], px[1], px[2], px[3]]))
                .collect();
            flatten_premul_over_bg_to_opaque_rgba8(&mut out, &premul, bg.to_array())?;
        }
        Ok(out)
    }
}

/// Immediate-mode 2D drawing target used by the frame renderer.
///
/// Draw calls accumulate until [`DrawSurface::snapshot`] rasterizes them; [`DrawSurface::clear`]
/// starts a new frame.
pub trait DrawSurface: TextMeasure {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Select the font size used by measuring and text drawing.
    fn set_font_size(&mut self, size_px: f32) -> ReelResult<()>;

    /// Discard pending draws and fill the whole surface with `color`.
    fn clear(&mut self, color: Rgba8);

    /// Outline `rect` with `color` at `line_width` pixels.
    fn stroke_rect(&mut self, rect: Rect, color: Rgba8, line_width: f64);

    /// Draw one line of text horizontally centered on `center_x`, top edge at `top_y`.
    fn fill_text_centered(&mut self, text: &str, center_x: f64, top_y: f64, color: Rgba8);

    /// Rasterize pending draws into a frame.
    fn snapshot(&mut self) -> ReelResult<FrameRGBA>;
}
