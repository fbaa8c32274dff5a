//! Collaborator contracts of the sprite batch.
//!
//! The batch never talks to a graphics API directly. It drives a [`SpriteDevice`] (buffer
//! allocation, map/unmap, binding, instanced draws, viewport) and reads textures through
//! [`SpriteTexture`]. [`super::WgpuSpriteDevice`] is the production implementation.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;

use crate::coords::Viewport;

use super::SpriteInstance;

/// Process-unique texture identity.
///
/// Two handles with the same id refer to the same GPU texture; the batch compares ids to
/// decide whether a draw continues the current batch.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TextureId(u64);

impl TextureId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Texture handle as seen by the batch: an identity plus a size in texels.
///
/// Clones are cheap and refer to the same resource. The batch keeps one clone for as long
/// as a batch using the texture is pending.
pub trait SpriteTexture: Clone {
    fn id(&self) -> TextureId;

    /// `(width, height)` in texels.
    fn size(&self) -> (u32, u32);
}

/// Graphics-device capabilities consumed by [`super::SpriteBatch`].
///
/// All methods are called from the thread that owns the graphics context. Errors are
/// programmer errors from the batch's point of view; it reports them through
/// [`crate::debug::check`].
pub trait SpriteDevice {
    type Texture: SpriteTexture;

    /// Allocates the instance buffer: `capacity` records, writable by the CPU and readable
    /// by shaders. Called once from `SpriteBatch::init`.
    fn allocate(&mut self, capacity: usize) -> Result<()>;

    /// Maps the instance buffer for writing with discard semantics: the device may hand
    /// out fresh backing memory instead of waiting for in-flight GPU reads.
    fn map_discard(&mut self) -> Result<()>;

    /// Ends CPU access. `written` holds the records written since the matching map, in
    /// order; it is empty when a mapping is released without any writes.
    fn unmap(&mut self, written: &[SpriteInstance]) -> Result<()>;

    /// Binds the fixed sprite shader pair and triangle-list topology.
    fn bind_pipeline(&mut self) -> Result<()>;

    /// Binds the unmapped instance buffer as a read-only shader resource together with
    /// `texture` and the sprite sampler.
    fn bind_resources(&mut self, texture: &Self::Texture) -> Result<()>;

    /// Issues one instanced draw over the bound resources.
    fn draw_instanced(&mut self, vertices_per_instance: u32, instance_count: u32) -> Result<()>;

    /// Current display size. Read at every draw call.
    fn viewport(&self) -> Viewport;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_ids_are_unique() {
        let a = TextureId::next();
        let b = TextureId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }
}
