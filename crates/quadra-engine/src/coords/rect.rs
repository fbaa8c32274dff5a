use super::Vec2;

/// Axis-aligned rectangle, top-left origin.
///
/// Used both for destination rects (display pixels) and source rects (texels). No
/// normalization is applied anywhere in the sprite path: negative sizes flip the sprite,
/// out-of-range rects are passed through as-is.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rect from integer pixel/texel coordinates.
    #[inline]
    pub fn from_i32(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(x as f32, y as f32, w as f32, h as f32)
    }

    /// Rect covering a whole `width` × `height` image, e.g. a full-texture source rect.
    #[inline]
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn translate(self, offset: Vec2) -> Self {
        Self::from_origin_size(self.origin + offset, self.size)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }
}
