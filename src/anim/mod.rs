//! Scroll timeline and the preview animation driver.

/// Tick-driven preview animator.
pub mod driver;
/// Scheduler-free scroll run loop.
pub mod timeline;
