//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers, samplers) and record into the
//! frame's command encoder through a [`RenderTarget`].
//!
//! Convention:
//! - CPU geometry is in pixels (top-left origin, +Y down).
//! - The sprite renderer converts to NDC on the CPU, once per sprite.

mod ctx;
pub mod sprite;

pub use ctx::{RenderCtx, RenderTarget};
