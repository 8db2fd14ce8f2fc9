use crate::config::ScrollConfig;

/// Fraction of the content width that wrapped lines may occupy.
pub const WRAP_WIDTH_FRACTION: f64 = 0.95;

/// Measures rendered text width in the active font.
pub trait TextMeasure {
    /// Width of `text` in pixels.
    fn measure(&mut self, text: &str) -> f32;
}

impl<F> TextMeasure for F
where
    F: FnMut(&str) -> f32,
{
    fn measure(&mut self, text: &str) -> f32 {
        self(text)
    }
}

/// Greedily wrap one input line at word boundaries.
///
/// Words are separated by single spaces. A word wider than `max_width` on its own is emitted as
/// its own (overflowing) line; words are never split.
pub fn wrap_line(measure: &mut dyn TextMeasure, line: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in line.split(' ') {
        let candidate = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };

        if measure.measure(&candidate) <= max_width {
            current = candidate;
        } else if current.is_empty() {
            lines.push(candidate);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_owned()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap multi-line text. Blank input lines become exactly one empty output line.
pub fn wrap_text(measure: &mut dyn TextMeasure, text: &str, max_width: f32) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            out.push(String::new());
        } else {
            out.extend(wrap_line(measure, line, max_width));
        }
    }
    out
}

/// Width limit used for wrapping under `cfg`.
pub fn wrap_limit(cfg: &ScrollConfig) -> f32 {
    (cfg.content_width() * WRAP_WIDTH_FRACTION) as f32
}

/// Wrapped lines plus the vertical metrics derived from them.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedText {
    /// Lines in top-to-bottom order.
    pub lines: Vec<String>,
    /// Distance between consecutive line tops.
    pub line_spacing: f64,
}

impl WrappedText {
    /// Wrap `cfg.text` against [`wrap_limit`].
    pub fn layout(measure: &mut dyn TextMeasure, cfg: &ScrollConfig) -> Self {
        Self {
            lines: wrap_text(measure, &cfg.text, wrap_limit(cfg)),
            line_spacing: cfg.line_spacing(),
        }
    }

    /// Height of the whole text block.
    pub fn total_height(&self) -> f64 {
        self.lines.len() as f64 * self.line_spacing
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
