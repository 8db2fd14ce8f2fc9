use std::time::{Duration, Instant};

use crate::anim::timeline::{ScrollState, ScrollTimeline};
use crate::config::ScrollConfig;
use crate::foundation::error::ReelResult;
use crate::layout::wrap::WrappedText;
use crate::render::frame::draw_frame;
use crate::render::surface::DrawSurface;

/// Per-frame notification sent to the animation caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// Scroll offset the frame was drawn at.
    pub scroll_offset: f64,
    /// Height of the wrapped text block.
    pub total_height: f64,
    /// Whether this frame reached the completion offset.
    pub is_complete: bool,
}

/// Lifecycle of an [`Animator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
    /// No run, or the last run was stopped.
    Idle,
    /// A tick is pending.
    Running,
    /// The last run scrolled the text fully off the canvas.
    Completed,
}

type OnFrame = Box<dyn FnMut(FrameReport)>;
type ShouldContinue = Box<dyn FnMut() -> bool>;

struct ActiveRun {
    cfg: ScrollConfig,
    wrapped: WrappedText,
    timeline: ScrollTimeline,
    state: ScrollState,
    on_frame: OnFrame,
    should_continue: ShouldContinue,
}

/// Preview animation driver.
///
/// The host owns the schedule: it calls [`Animator::tick`] once per display refresh while
/// [`Animator::has_pending_tick`] is true. Nothing runs in the background.
pub struct Animator {
    state: AnimationState,
    run: Option<ActiveRun>,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator {
    /// Create an idle animator.
    pub fn new() -> Self {
        Self {
            state: AnimationState::Idle,
            run: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Whether the host should call [`Animator::tick`] again.
    pub fn has_pending_tick(&self) -> bool {
        self.state == AnimationState::Running
    }

    /// Scroll offset of the next frame, if a run is active.
    pub fn scroll_offset(&self) -> Option<f64> {
        self.run.as_ref().map(|r| r.state.scroll)
    }

    /// Start a run and draw its first frame immediately.
    ///
    /// Any previous run is discarded. When the surface cannot provide a font the error is
    /// returned and the animator stays idle without drawing.
    #[tracing::instrument(skip_all, fields(width = cfg.width, height = cfg.height))]
    pub fn start(
        &mut self,
        surface: &mut dyn DrawSurface,
        cfg: &ScrollConfig,
        on_frame: impl FnMut(FrameReport) + 'static,
        should_continue: impl FnMut() -> bool + 'static,
    ) -> ReelResult<()> {
        self.stop();
        cfg.validate()?;
        surface.set_font_size(cfg.font_size as f32)?;

        let wrapped = WrappedText::layout(&mut *surface, cfg);
        let timeline = ScrollTimeline::new(cfg, &wrapped);
        tracing::debug!(
            lines = wrapped.lines.len(),
            end = timeline.end,
            "animation started"
        );

        self.run = Some(ActiveRun {
            cfg: cfg.clone(),
            wrapped,
            timeline,
            state: timeline.initial(),
            on_frame: Box::new(on_frame),
            should_continue: Box::new(should_continue),
        });
        self.state = AnimationState::Running;
        self.tick(surface);
        Ok(())
    }

    /// Render the pending frame, report it, and schedule the next one when the run goes on.
    ///
    /// Returns the report of the rendered frame, or `None` when no tick was pending.
    pub fn tick(&mut self, surface: &mut dyn DrawSurface) -> Option<FrameReport> {
        if self.state != AnimationState::Running {
            return None;
        }
        let run = self.run.as_mut()?;

        let total_height = draw_frame(surface, &run.cfg, &run.wrapped, run.state.scroll);
        let is_complete = run.timeline.is_complete(run.state);
        let report = FrameReport {
            scroll_offset: run.state.scroll,
            total_height,
            is_complete,
        };
        (run.on_frame)(report);

        if is_complete {
            self.state = AnimationState::Completed;
        } else if (run.should_continue)() {
            let (next, _) = run.timeline.advance(run.state, 1.0);
            run.state = next;
        } else {
            self.state = AnimationState::Idle;
        }
        Some(report)
    }

    /// Cancel the pending tick. A no-op when idle.
    pub fn stop(&mut self) {
        if self.state == AnimationState::Running {
            self.state = AnimationState::Idle;
        }
    }
}

/// Drive `animator` until it has no pending tick, sleeping to hold `refresh_hz`.
///
/// Returns the number of ticks run by this call.
pub fn run_paced(animator: &mut Animator, surface: &mut dyn DrawSurface, refresh_hz: f64) -> u64 {
    let period = Duration::from_secs_f64(1.0 / refresh_hz.max(1.0));
    let mut ticks = 0;
    let mut next_at = Instant::now() + period;
    while animator.has_pending_tick() {
        let now = Instant::now();
        if next_at > now {
            std::thread::sleep(next_at - now);
        }
        next_at += period;
        if animator.tick(surface).is_some() {
            ticks += 1;
        }
    }
    ticks
}

/// Drive `animator` until it has no pending tick, without waiting between ticks.
pub fn run_unpaced(animator: &mut Animator, surface: &mut dyn DrawSurface) -> u64 {
    let mut ticks = 0;
    while animator.tick(surface).is_some() {
        ticks += 1;
    }
    ticks
}
