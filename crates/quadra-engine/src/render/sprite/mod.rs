//! Sprite batch renderer.
//!
//! Accumulates textured, axis-aligned rectangles and submits them as instanced draws, one
//! per maximal run of sprites sharing a texture:
//!
//! - [`SpriteBatch`]: begin/draw/end state machine and flush policy
//! - [`InstanceBuffer`]: fixed-capacity, discard-mapped instance storage
//! - [`transform`]: pixel/texel rects to NDC/UV
//! - [`quad`]: 6-vertex expansion shared with `shaders/sprite.wgsl`
//! - [`SpriteDevice`] / [`SpriteTexture`]: what the batch needs from the graphics API,
//!   implemented for wgpu by [`WgpuSpriteDevice`] and [`crate::texture::Texture`]

mod batch;
mod buffer;
mod device;
mod instance;
mod shader;
mod wgpu_device;

pub mod quad;
pub mod transform;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{BatchStats, SpriteBatch, SpriteBatchConfig};
pub use buffer::InstanceBuffer;
pub use device::{SpriteDevice, SpriteTexture, TextureId};
pub use instance::{SpriteInstance, INSTANCE_SIZE};
pub use shader::{ShaderStage, SpriteShader};
pub use wgpu_device::{SamplerConfig, WgpuSpriteDevice};
