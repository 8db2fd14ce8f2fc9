use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::error::{ReelError, ReelResult};

/// Unit brush; color is applied at draw time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PlainBrush;

/// One shaped line, ready to be placed and filled.
pub(crate) type ShapedLine = Arc<parley::Layout<PlainBrush>>;

/// Parley contexts bound to a single font file.
///
/// Lines are shaped without wrapping (wrapping is done by `layout::wrap` against
/// [`TextEngine::measure`]) and cached per font size. Each glyph run carries the face it was
/// shaped with, so collections and fallback faces rasterize with matching glyph ids.
pub(crate) struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<PlainBrush>,
    family_name: String,
    size_px: f32,
    cache: HashMap<String, ShapedLine>,
}

impl TextEngine {
    /// Register `font_bytes` and pick `preferred_family` when the file provides it.
    pub(crate) fn new(font_bytes: Vec<u8>, preferred_family: Option<&str>) -> ReelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes), None);

        let mut names = Vec::with_capacity(families.len());
        for (id, _) in &families {
            if let Some(name) = font_ctx.collection.family_name(*id) {
                names.push(name.to_string());
            }
        }
        let family_name = preferred_family
            .and_then(|want| names.iter().find(|n| n.eq_ignore_ascii_case(want)))
            .or_else(|| names.first())
            .cloned()
            .ok_or_else(|| ReelError::surface("no font families registered from font bytes"))?;

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            size_px: 16.0,
            cache: HashMap::new(),
        })
    }

    /// Family actually used for shaping.
    pub(crate) fn family_name(&self) -> &str {
        &self.family_name
    }

    pub(crate) fn set_size_px(&mut self, size_px: f32) -> ReelResult<()> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation("font size must be finite and > 0"));
        }
        if size_px != self.size_px {
            self.size_px = size_px;
            self.cache.clear();
        }
        Ok(())
    }

    /// Shape `text` as a single unwrapped line at the current size.
    pub(crate) fn shape(&mut self, text: &str) -> ShapedLine {
        if let Some(line) = self.cache.get(text) {
            return line.clone();
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(PlainBrush));

        let mut layout: parley::Layout<PlainBrush> = builder.build(text);
        layout.break_all_lines(None);

        let line = Arc::new(layout);
        self.cache.insert(text.to_owned(), line.clone());
        line
    }

    /// Advance width of `text` at the current size.
    pub(crate) fn measure(&mut self, text: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        self.shape(text).width()
    }
}
