//! Coordinate and geometry types shared by the renderer and its callers.
//!
//! Canonical CPU space:
//! - Pixels, origin top-left
//! - +X right, +Y down
//!
//! The sprite renderer converts destination rects to NDC on the CPU, per draw, using the
//! current viewport.

mod color;
mod rect;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
