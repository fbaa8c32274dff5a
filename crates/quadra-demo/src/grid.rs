//! Procedural content for the demo: a checkerboard texture and a sprite grid layout.

use quadra_engine::coords::Rect;

/// RGBA8 checkerboard, `size` × `size` texels with square cells of `cell` texels.
pub fn checkerboard(size: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Vec<u8> {
    let cell = cell.max(1);
    let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);
    for y in 0..size {
        for x in 0..size {
            let texel = if (x / cell + y / cell) % 2 == 0 { a } else { b };
            pixels.extend_from_slice(&texel);
        }
    }
    pixels
}

/// Destination rects of a `cols` × `rows` grid of `tile`-pixel sprites, row-major,
/// offset horizontally by `scroll` pixels (wrapping at the grid width).
pub fn layout(cols: u32, rows: u32, tile: f32, scroll: f32) -> impl Iterator<Item = Rect> {
    let width = cols as f32 * tile;
    let shift = if width > 0.0 { scroll.rem_euclid(width) } else { 0.0 };
    (0..rows).flat_map(move |row| {
        (0..cols).map(move |col| {
            let x = (col as f32 * tile + shift) % width - tile;
            Rect::new(x, row as f32 * tile, tile, tile)
        })
    })
}

/// `count` squares of `size` pixels in a row across the middle of a `width` × `height`
/// surface, bobbing vertically with `phase`.
pub fn badges(count: u32, size: f32, width: f32, height: f32, phase: f32) -> impl Iterator<Item = Rect> {
    let step = width / count.max(1) as f32;
    (0..count).map(move |i| {
        let bob = ((phase * 0.05) + i as f32 * 0.8).sin() * size * 0.5;
        let x = i as f32 * step + (step - size) * 0.5;
        let y = (height - size) * 0.5 + bob;
        Rect::new(x, y, size, size)
    })
}

/// Grid size that covers a `width` × `height` pixel surface with `tile`-pixel sprites.
pub fn cover(width: u32, height: u32, tile: f32) -> (u32, u32) {
    let cols = (width as f32 / tile).ceil() as u32 + 1;
    let rows = (height as f32 / tile).ceil() as u32;
    (cols, rows)
}
