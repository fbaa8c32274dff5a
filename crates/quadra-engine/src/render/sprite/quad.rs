//! Quad expansion contract.
//!
//! The vertex stage turns each [`SpriteInstance`] into 6 vertices (two triangles, no index
//! buffer) by picking a corner per `vertex_index`. The duplicated corners form the diagonal
//! from `(x0, y0)` to `(x1, y1)`. This module is the CPU mirror of the table in
//! `shaders/sprite.wgsl`; tests keep the two in sync.

#[cfg(test)]
use super::SpriteInstance;

/// Vertices drawn per sprite instance.
pub const VERTICES_PER_SPRITE: u32 = 6;

/// Rectangle corner, named for a sprite with positive size.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Corner {
    /// `(x0, y0)` / `(u0, v0)`
    TopLeft,
    /// `(x1, y0)` / `(u1, v0)`
    TopRight,
    /// `(x1, y1)` / `(u1, v1)`
    BottomRight,
    /// `(x0, y1)` / `(u0, v1)`
    BottomLeft,
}

/// Corner visited by each of the 6 vertices, in `vertex_index` order.
pub const QUAD_CORNERS: [Corner; VERTICES_PER_SPRITE as usize] = [
    Corner::TopLeft,
    Corner::TopRight,
    Corner::BottomRight,
    Corner::BottomRight,
    Corner::BottomLeft,
    Corner::TopLeft,
];

/// One expanded vertex: NDC position + texture coordinate.
#[cfg(test)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl Corner {
    /// Index used by the shader's corner table.
    #[inline]
    pub const fn index(self) -> u32 {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomRight => 2,
            Corner::BottomLeft => 3,
        }
    }

    #[cfg(test)]
    pub(crate) fn select(self, s: &SpriteInstance) -> QuadVertex {
        match self {
            Corner::TopLeft => QuadVertex { position: [s.x0, s.y0], uv: [s.u0, s.v0] },
            Corner::TopRight => QuadVertex { position: [s.x1, s.y0], uv: [s.u1, s.v0] },
            Corner::BottomRight => QuadVertex { position: [s.x1, s.y1], uv: [s.u1, s.v1] },
            Corner::BottomLeft => QuadVertex { position: [s.x0, s.y1], uv: [s.u0, s.v1] },
        }
    }
}

/// Expands one instance exactly as the vertex stage does.
#[cfg(test)]
pub(crate) fn expand(sprite: &SpriteInstance) -> [QuadVertex; VERTICES_PER_SPRITE as usize] {
    QUAD_CORNERS.map(|corner| corner.select(sprite))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite() -> SpriteInstance {
        SpriteInstance { x0: -1.0, y0: 1.0, x1: 0.5, y1: -0.5, u0: 0.0, v0: 0.0, u1: 0.25, v1: 0.75 }
    }

    fn signed_area(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
        0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]))
    }

    #[test]
    fn corner_order() {
        let v = expand(&sprite());
        let positions: Vec<[f32; 2]> = v.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![[-1.0, 1.0], [0.5, 1.0], [0.5, -0.5], [0.5, -0.5], [-1.0, -0.5], [-1.0, 1.0]]
        );
    }

    #[test]
    fn uvs_follow_their_corners() {
        let v = expand(&sprite());
        assert_eq!(v[0].uv, [0.0, 0.0]);
        assert_eq!(v[1].uv, [0.25, 0.0]);
        assert_eq!(v[2].uv, [0.25, 0.75]);
        assert_eq!(v[4].uv, [0.0, 0.75]);
    }

    #[test]
    fn triangles_share_the_diagonal() {
        let v = expand(&sprite());
        assert_eq!(v[0], v[5]);
        assert_eq!(v[2], v[3]);
    }

    #[test]
    fn triangles_cover_the_rect_with_one_winding() {
        let s = sprite();
        let v = expand(&s);
        let a = signed_area(v[0].position, v[1].position, v[2].position);
        let b = signed_area(v[3].position, v[4].position, v[5].position);
        assert!(a.signum() == b.signum());
        let rect_area = (s.x1 - s.x0).abs() * (s.y1 - s.y0).abs();
        assert!((a.abs() + b.abs() - rect_area).abs() < 1e-6);
    }

    #[test]
    fn shader_corner_table_matches() {
        let table = QUAD_CORNERS
            .iter()
            .map(|c| format!("{}u", c.index()))
            .collect::<Vec<_>>()
            .join(", ");
        let expected = format!("array<u32, 6>({table})");
        assert!(
            include_str!("shaders/sprite.wgsl").contains(&expected),
            "sprite.wgsl corner table out of sync, expected `{expected}`"
        );
    }
}
