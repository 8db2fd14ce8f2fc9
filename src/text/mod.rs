//! Font loading and single-line shaping.

pub(crate) mod engine;
