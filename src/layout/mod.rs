//! Word-wrapped text layout.

pub(crate) mod wrap;
