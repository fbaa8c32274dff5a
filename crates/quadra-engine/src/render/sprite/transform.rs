//! Pixel/texel rects to the normalized spaces the GPU consumes.
//!
//! Both functions are pure and cheap; the batch recomputes them for every draw with the
//! viewport and texture size current at that moment. Out-of-range input is not clamped.

use crate::coords::{Rect, Viewport};

/// Destination rect (pixels, top-left origin, +Y down) to NDC corners `[x0, y0, x1, y1]`
/// (center origin, +Y up). `(x0, y0)` is the top-left corner.
#[inline]
pub fn dst_to_ndc(dst: Rect, viewport: Viewport) -> [f32; 4] {
    let (half_w, half_h) = viewport.half_extents();
    let x0 = dst.origin.x / half_w - 1.0;
    let y0 = 1.0 - dst.origin.y / half_h;
    let x1 = x0 + dst.size.x / half_w;
    let y1 = y0 - dst.size.y / half_h;
    [x0, y0, x1, y1]
}

/// Source rect (texels, top-left origin) to normalized texture corners `[u0, v0, u1, v1]`.
#[inline]
pub fn src_to_uv(src: Rect, texture_size: (u32, u32)) -> [f32; 4] {
    let tw = texture_size.0 as f32;
    let th = texture_size.1 as f32;
    let u0 = src.origin.x / tw;
    let v0 = src.origin.y / th;
    let u1 = u0 + src.size.x / tw;
    let v1 = v0 + src.size.y / th;
    [u0, v0, u1, v1]
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── dst_to_ndc ────────────────────────────────────────────────────────

    #[test]
    fn top_left_rect_on_full_hd() {
        let ndc = dst_to_ndc(Rect::new(0.0, 0.0, 100.0, 50.0), Viewport::new(1920.0, 1080.0));
        assert_eq!(ndc, [-1.0, 1.0, -1.0 + 100.0 / 960.0, 1.0 - 50.0 / 540.0]);
    }

    #[test]
    fn full_viewport_maps_to_unit_square() {
        let ndc = dst_to_ndc(Rect::new(0.0, 0.0, 640.0, 480.0), Viewport::new(640.0, 480.0));
        assert_eq!(ndc, [-1.0, 1.0, 1.0, -1.0]);
    }

    #[test]
    fn y_axis_is_flipped() {
        let [_, y0, _, y1] = dst_to_ndc(Rect::new(0.0, 100.0, 10.0, 100.0), Viewport::new(200.0, 200.0));
        assert_eq!(y0, 0.0);
        assert_eq!(y1, -1.0);
        assert!(y1 < y0);
    }

    #[test]
    fn offscreen_rects_are_not_clamped() {
        let ndc = dst_to_ndc(Rect::new(-200.0, 400.0, 100.0, 100.0), Viewport::new(200.0, 200.0));
        assert_eq!(ndc, [-3.0, -3.0, -2.0, -4.0]);
    }

    // ── src_to_uv ─────────────────────────────────────────────────────────

    #[test]
    fn top_left_quadrant_of_square_texture() {
        assert_eq!(src_to_uv(Rect::new(0.0, 0.0, 128.0, 128.0), (256, 256)), [0.0, 0.0, 0.5, 0.5]);
    }

    #[test]
    fn non_square_texture_uses_both_dimensions() {
        assert_eq!(src_to_uv(Rect::new(64.0, 16.0, 64.0, 16.0), (128, 32)), [0.5, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn source_outside_texture_passes_through() {
        assert_eq!(src_to_uv(Rect::new(256.0, 0.0, 256.0, 128.0), (256, 256)), [1.0, 0.0, 2.0, 0.5]);
    }
}
