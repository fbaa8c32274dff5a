//! Quadra engine crate.
//!
//! Owns the platform + GPU runtime pieces and the sprite batch renderer built on top of them.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod debug;
pub mod render;
pub mod texture;
