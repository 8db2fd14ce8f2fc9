//! Drawing surfaces and the scroll frame renderer.

/// `vello_cpu` raster surface.
pub mod cpu;
pub(crate) mod frame;
/// Drawing surface contract and frame buffers.
pub mod surface;
