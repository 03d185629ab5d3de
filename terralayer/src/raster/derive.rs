//! Derived rasters: normal maps from height tiles, thumbnails for previews.

use image::imageops::FilterType;

use super::tile::RasterTile;
use super::types::{Pixel, PixelFormat};

/// Derive a tangent-space normal map from a height tile.
///
/// Uses central differences with edge replication; `spacing` is the world
/// distance between adjacent pixels. Normals are packed into RGBA8 as
/// `0.5 * n + 0.5` with opaque alpha. Non-height input yields a flat
/// "straight up" map.
pub fn normal_from_height(tile: &RasterTile, spacing: f32) -> RasterTile {
    let size = tile.size();
    let Some(img) = tile.height_image() else {
        return RasterTile::filled(size, PixelFormat::Rgba8, Pixel::NORMAL_UP);
    };

    let sample = |x: i64, y: i64| -> f32 {
        let x = x.clamp(0, size as i64 - 1) as u32;
        let y = y.clamp(0, size as i64 - 1) as u32;
        img.get_pixel(x, y).0[0]
    };

    let mut out = RasterTile::filled(size, PixelFormat::Rgba8, Pixel::NORMAL_UP);
    let step = 2.0 * spacing;
    for y in 0..size as i64 {
        for x in 0..size as i64 {
            let dx = (sample(x + 1, y) - sample(x - 1, y)) / step;
            let dz = (sample(x, y + 1) - sample(x, y - 1)) / step;
            let len = (dx * dx + dz * dz + 1.0).sqrt();
            let n = (-dx / len, 1.0 / len, -dz / len);
            out.set_pixel(
                x as u32,
                y as u32,
                Pixel::new(n.0 * 0.5 + 0.5, n.2 * 0.5 + 0.5, n.1 * 0.5 + 0.5, 1.0),
            );
        }
    }
    out
}

/// Downsample a tile to a square preview of the given side length.
pub fn thumbnail(tile: &RasterTile, size: u32) -> RasterTile {
    tile.resized(size, FilterType::Triangle)
}
