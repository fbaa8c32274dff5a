use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Viewport};

use super::transform::{dst_to_ndc, src_to_uv};

/// One sprite as stored in the instance buffer (32 bytes).
///
///  offset  0  x0 y0 x1 y1   corners in NDC
///  offset 16  u0 v0 u1 v1   corners in normalized texture space
///
/// Layout must match `struct Sprite` in `shaders/sprite.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

/// Size of one [`SpriteInstance`] in bytes.
pub const INSTANCE_SIZE: usize = std::mem::size_of::<SpriteInstance>();

const _: () = assert!(INSTANCE_SIZE == 32);

impl SpriteInstance {
    /// Builds the record for drawing `src` (texels of a `texture_size` texture) into `dst`
    /// (pixels of `viewport`).
    #[inline]
    pub fn new(dst: Rect, src: Rect, viewport: Viewport, texture_size: (u32, u32)) -> Self {
        let [x0, y0, x1, y1] = dst_to_ndc(dst, viewport);
        let [u0, v0, u1, v1] = src_to_uv(src, texture_size);
        Self { x0, y0, x1, y1, u0, v0, u1, v1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_eight_floats_in_declaration_order() {
        let s = SpriteInstance { x0: 1.0, y0: 2.0, x1: 3.0, y1: 4.0, u0: 5.0, v0: 6.0, u1: 7.0, v1: 8.0 };
        let floats: [f32; 8] = bytemuck::cast(s);
        assert_eq!(floats, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn new_combines_both_transforms() {
        let s = SpriteInstance::new(
            Rect::new(400.0, 300.0, 400.0, 300.0),
            Rect::new(32.0, 0.0, 32.0, 64.0),
            Viewport::new(800.0, 600.0),
            (64, 64),
        );
        assert_eq!(
            s,
            SpriteInstance { x0: 0.0, y0: 0.0, x1: 1.0, y1: -1.0, u0: 0.5, v0: 0.0, u1: 1.0, v1: 1.0 }
        );
    }
}
