/// Display size in pixels.
///
/// The sprite renderer reads this at every draw call, so a resize between two draws of
/// the same session takes effect immediately.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Viewport covering a physical surface of `width` × `height` pixels.
    #[inline]
    pub fn from_physical(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// Half extents `(W/2, H/2)`: the pixel distance from the NDC origin to either edge.
    #[inline]
    pub fn half_extents(self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_extents_of_full_hd() {
        assert_eq!(Viewport::from_physical(1920, 1080).half_extents(), (960.0, 540.0));
    }

    #[test]
    fn zero_sized_viewport_is_invalid() {
        assert!(!Viewport::new(0.0, 600.0).is_valid());
        assert!(!Viewport::new(800.0, f32::INFINITY).is_valid());
        assert!(Viewport::new(800.0, 600.0).is_valid());
    }
}
