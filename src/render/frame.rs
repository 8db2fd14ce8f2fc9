use crate::config::ScrollConfig;
use crate::foundation::core::Rect;
use crate::foundation::error::ReelResult;
use crate::layout::wrap::WrappedText;
use crate::render::surface::DrawSurface;

/// Alpha applied to the text color for the padding guide.
pub const PADDING_GUIDE_ALPHA: f32 = 0.2;

/// Draw one frame of `wrapped` scrolled by `scroll_offset` and return the text block height.
///
/// Line `i` has its top edge at `(height - scroll_offset) + i * line_spacing`; lines further
/// than one line spacing outside the canvas are skipped.
pub fn draw_frame(
    surface: &mut dyn DrawSurface,
    cfg: &ScrollConfig,
    wrapped: &WrappedText,
    scroll_offset: f64,
) -> f64 {
    let height = f64::from(cfg.height);
    let text_color = cfg.text_color.rgba8();

    surface.clear(cfg.background_color.rgba8());

    if cfg.padding > 0.0 {
        let guide = Rect::new(
            cfg.padding,
            cfg.padding,
            f64::from(cfg.width) - cfg.padding,
            height - cfg.padding,
        );
        surface.stroke_rect(guide, text_color.with_alpha_mul(PADDING_GUIDE_ALPHA), 1.0);
    }

    let center_x = cfg.padding + cfg.content_width() / 2.0;
    let spacing = wrapped.line_spacing;
    let start_y = height - scroll_offset;

    for (i, line) in wrapped.lines.iter().enumerate() {
        let y = start_y + (i as f64) * spacing;
        if y > -spacing && y < height + spacing {
            surface.fill_text_centered(line, center_x, y, text_color);
        }
    }

    wrapped.total_height()
}

/// Lay out `cfg.text` on `surface` and draw a single frame at `scroll_offset`.
pub fn render_frame(
    surface: &mut dyn DrawSurface,
    cfg: &ScrollConfig,
    scroll_offset: f64,
) -> ReelResult<WrappedText> {
    cfg.validate()?;
    surface.set_font_size(cfg.font_size as f32)?;
    let wrapped = WrappedText::layout(&mut *surface, cfg);
    draw_frame(surface, cfg, &wrapped, scroll_offset);
    Ok(wrapped)
}
