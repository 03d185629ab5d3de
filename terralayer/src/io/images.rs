//! Image import and export: the codec boundary.
//!
//! Import slices arbitrarily sized source images into region-size tiles,
//! creating regions as needed; export stitches a layer's regions back into
//! one image at their grid offsets and writes it through the `image` crate.

use std::path::Path;

use image::{ImageBuffer, Luma, RgbaImage};
use tracing::{info, warn};

use crate::coord::{self, RegionCoord, WorldPos};
use crate::raster::{HeightImage, MapKind, Pixel, PixelFormat, RasterTile};
use crate::storage::{StorageError, StorageResult, TerrainStorage};

/// Seed terrain from up to three source images in `[height, control, color]`
/// order, anchored at the region containing `world`.
///
/// Images larger than one region are sliced into as many regions as they
/// cover (short edges padded with layer defaults). Height values are mapped
/// through `value * scale + offset`. Regions that already exist have the
/// provided layers replaced; missing layers of new regions get defaults.
///
/// Fails with `GridBoundsExceeded` before any mutation if the covered area
/// leaves the region grid; a wrong-format source image is skipped with a
/// warning, matching the sanitizer's degrade-not-fail policy.
pub fn import_images(
    storage: &mut TerrainStorage,
    sources: [Option<RasterTile>; 3],
    world: WorldPos,
    offset: f32,
    scale: f32,
) -> StorageResult<()> {
    let region_size = storage.region_size().pixels();

    // Drop wrong-format sources up front.
    let mut sources = sources;
    for (slot, kind) in MapKind::ALL.iter().enumerate() {
        if let Some(src) = &sources[slot] {
            if src.format() != kind.format() {
                warn!(
                    "skipping {} import source: expected {:?}, got {:?}",
                    kind,
                    kind.format(),
                    src.format()
                );
                sources[slot] = None;
            }
        }
    }

    let (width, height) = sources
        .iter()
        .flatten()
        .fold((0, 0), |(w, h), src| (w.max(src.width()), h.max(src.height())));
    if width == 0 || height == 0 {
        warn!("import called with no usable source images");
        return Ok(());
    }

    let anchor = coord::region_coord_of(world, region_size);
    let regions_x = width.div_ceil(region_size);
    let regions_y = height.div_ceil(region_size);

    // Validate the whole covered area before touching anything.
    for ry in 0..regions_y {
        for rx in 0..regions_x {
            let coord = RegionCoord::new(anchor.x + rx as i32, anchor.y + ry as i32);
            if !coord.in_grid() {
                return Err(StorageError::GridBoundsExceeded { coord });
            }
        }
    }

    for ry in 0..regions_y {
        for rx in 0..regions_x {
            let coord = RegionCoord::new(anchor.x + rx as i32, anchor.y + ry as i32);
            let tiles: Vec<RasterTile> = MapKind::ALL
                .iter()
                .enumerate()
                .map(|(slot, &kind)| {
                    slice_tile(kind, region_size, sources[slot].as_ref(), rx, ry, offset, scale)
                })
                .collect();

            let region_world = WorldPos::new(
                (coord.x as i64 * region_size as i64) as f32,
                (coord.y as i64 * region_size as i64) as f32,
            );
            if let Some(index) = storage.get_region_index(region_world) {
                for (slot, tile) in tiles.into_iter().enumerate() {
                    if sources[slot].is_some() {
                        storage.set_map_region(MapKind::ALL[slot], index, tile)?;
                    }
                }
            } else {
                storage.add_region_with_maps(region_world, tiles)?;
            }
        }
    }

    storage.update_height_range();
    info!(
        "imported {}x{} px into {} region(s)",
        width,
        height,
        regions_x * regions_y
    );
    Ok(())
}

fn slice_tile(
    kind: MapKind,
    region_size: u32,
    source: Option<&RasterTile>,
    rx: u32,
    ry: u32,
    offset: f32,
    scale: f32,
) -> RasterTile {
    let mut tile = RasterTile::filled(region_size, kind.format(), kind.default_fill());
    let Some(src) = source else {
        return tile;
    };
    for y in 0..region_size {
        for x in 0..region_size {
            let sx = rx * region_size + x;
            let sy = ry * region_size + y;
            if sx < src.width() && sy < src.height() {
                let mut p: Pixel = src.get_pixel(sx, sy);
                if kind == MapKind::Height {
                    p.r = p.r * scale + offset;
                }
                tile.set_pixel(x, y, p);
            }
        }
    }
    tile
}

/// Stitch every region of one layer into a single image at its grid offset.
///
/// Cells inside the bounding box with no region read as the layer default.
/// `None` when no regions exist.
pub fn layered_to_image(storage: &TerrainStorage, kind: MapKind) -> Option<RasterTile> {
    let offsets = storage.region_offsets();
    let first = offsets.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for coord in offsets {
        min_x = min_x.min(coord.x);
        min_y = min_y.min(coord.y);
        max_x = max_x.max(coord.x);
        max_y = max_y.max(coord.y);
    }

    let region_size = storage.region_size().pixels();
    let width = (max_x - min_x + 1) as u32 * region_size;
    let height = (max_y - min_y + 1) as u32 * region_size;
    let mut out = match kind.format() {
        PixelFormat::Rf32 => RasterTile::from_height_image(HeightImage::new(width, height)),
        PixelFormat::Rgba8 => RasterTile::from_rgba_image(RgbaImage::new(width, height)),
    };
    out.fill(kind.default_fill());

    for (index, coord) in offsets.iter().enumerate() {
        let ox = (coord.x - min_x) as u32 * region_size;
        let oy = (coord.y - min_y) as u32 * region_size;
        let tile = &storage.get_maps(kind)[index];
        for y in 0..region_size {
            for x in 0..region_size {
                out.set_pixel(ox + x, oy + y, tile.get_pixel(x, y));
            }
        }
    }
    Some(out)
}

/// Export one layer as an image file.
///
/// Height is written as 16-bit grayscale normalized over the tracked height
/// range; control and color are written as RGBA8. The format follows the
/// path extension, as the `image` crate resolves it.
pub fn export_image<P: AsRef<Path>>(
    storage: &TerrainStorage,
    path: P,
    kind: MapKind,
) -> StorageResult<()> {
    let stitched = layered_to_image(storage, kind)
        .ok_or_else(|| StorageError::InvalidFormat("no terrain data to export".into()))?;

    match kind {
        MapKind::Height => {
            let range = storage.height_range();
            let span = range.span();
            let (width, height) = (stitched.width(), stitched.height());
            let mut out: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(width, height);
            for y in 0..height {
                for x in 0..width {
                    let v = stitched.get_pixel(x, y).r;
                    let norm = if span > 0.0 { (v - range.min) / span } else { 0.0 };
                    out.put_pixel(
                        x,
                        y,
                        Luma([(norm.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16]),
                    );
                }
            }
            out.save(path)?;
        }
        MapKind::Control | MapKind::Color => {
            let image = stitched
                .rgba_image()
                .ok_or_else(|| StorageError::InvalidFormat("layer is not rgba".into()))?;
            image.save(path)?;
        }
    }
    Ok(())
}
