use crate::config::ScrollConfig;
use crate::layout::wrap::WrappedText;

/// Display refresh rate that one scroll step is defined against.
pub const REFRESH_HZ: f64 = 60.0;

/// Scroll position within a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    /// Current scroll offset in pixels.
    pub scroll: f64,
    /// Elapsed display ticks since the run started.
    pub ticks: f64,
}

/// Whether a run should keep going after an advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// More frames follow.
    Continue,
    /// The text has fully left the canvas.
    Complete,
}

/// Pure scroll run loop for one wrapped text block.
///
/// Time is measured in display ticks (`1 / REFRESH_HZ` seconds); each tick moves the text by
/// `scroll_speed / 10` pixels. The scroll offset never passes `end`, so the completion offset is
/// the same at any frame rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTimeline {
    /// Offset of the first frame (text just below the canvas).
    pub start: f64,
    /// Offset at which the text has fully scrolled off the top.
    pub end: f64,
    /// Pixels per display tick.
    pub step_per_tick: f64,
}

impl ScrollTimeline {
    /// Timeline for `wrapped` under `cfg`.
    pub fn new(cfg: &ScrollConfig, wrapped: &WrappedText) -> Self {
        Self::from_parts(
            f64::from(cfg.height),
            wrapped.total_height(),
            cfg.padding,
            cfg.scroll_speed,
        )
    }

    /// Timeline from raw canvas height, text height, padding and speed.
    pub fn from_parts(canvas_height: f64, text_height: f64, padding: f64, speed: f64) -> Self {
        Self {
            start: -padding,
            end: canvas_height + text_height + padding,
            step_per_tick: speed / 10.0,
        }
    }

    /// State of the first frame.
    pub fn initial(&self) -> ScrollState {
        ScrollState {
            scroll: self.start,
            ticks: 0.0,
        }
    }

    /// Whether `state` has reached the completion offset.
    pub fn is_complete(&self, state: ScrollState) -> bool {
        state.scroll >= self.end
    }

    /// Advance `state` by `elapsed_ticks` display ticks.
    pub fn advance(&self, state: ScrollState, elapsed_ticks: f64) -> (ScrollState, Flow) {
        let next = ScrollState {
            scroll: (state.scroll + self.step_per_tick * elapsed_ticks).min(self.end),
            ticks: state.ticks + elapsed_ticks,
        };
        let flow = if self.is_complete(next) {
            Flow::Complete
        } else {
            Flow::Continue
        };
        (next, flow)
    }

    /// Total scroll distance of the run.
    pub fn distance(&self) -> f64 {
        self.end - self.start
    }

    /// Percentage of the distance covered by `state`, clamped to `0..=100`.
    pub fn progress(&self, state: ScrollState) -> f64 {
        let distance = self.distance();
        if distance <= 0.0 {
            return 100.0;
        }
        ((state.scroll - self.start) / distance * 100.0).clamp(0.0, 100.0)
    }

    /// Display ticks needed to cover the whole distance.
    pub fn duration_ticks(&self) -> f64 {
        self.distance() / self.step_per_tick
    }

    /// Wall-clock duration of the run at the reference refresh rate.
    pub fn duration_secs(&self) -> f64 {
        self.duration_ticks() / REFRESH_HZ
    }

    /// Number of frames (including the first and the completing one) when every frame
    /// advances `ticks_per_frame` ticks.
    pub fn frames_to_complete(&self, ticks_per_frame: f64) -> u64 {
        let steps = (self.duration_ticks() / ticks_per_frame).ceil().max(0.0) as u64;
        steps + 1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/anim/timeline.rs"]
mod tests;
