//! Binary persisted layout for a terrain.
//!
//! Little-endian throughout: a `TLAY` magic, the scalar configuration
//! (format version, region size, save mode, noise parameters, height range),
//! the ordered region coordinate list, then per region one tile per layer in
//! [`MapKind::ALL`] order. The coordinate order in the file defines dense
//! index assignment on load.
//!
//! Height tiles are stored as raw 32-bit floats, or quantized to 16 bits
//! over the recorded height range when the save-16-bit mode is on.

use std::io::{Read, Write};

use image::RgbaImage;
use tracing::debug;

use crate::config::{NoiseParams, StorageConfig, RegionSize};
use crate::coord::RegionCoord;
use crate::height_range::HeightRange;
use crate::raster::{HeightImage, MapKind, RasterTile};
use crate::render::RenderBackend;
use crate::storage::{StorageError, StorageResult, TerrainStorage};

/// File identification bytes.
pub const MAGIC: [u8; 4] = *b"TLAY";

/// Maximum regions the fixed grid can hold; used as a decode sanity bound.
const MAX_REGIONS: u32 = 256;

/// Serialize a terrain's full state.
pub fn save_to<W: Write>(storage: &TerrainStorage, writer: &mut W) -> StorageResult<()> {
    writer.write_all(&MAGIC)?;
    write_f32(writer, storage.version())?;
    write_u32(writer, storage.region_size().pixels())?;
    writer.write_all(&[storage.save_16_bit() as u8])?;

    let noise = storage.noise();
    writer.write_all(&[noise.enabled as u8])?;
    write_f32(writer, noise.scale)?;
    write_f32(writer, noise.height)?;
    write_f32(writer, noise.blend_near)?;
    write_f32(writer, noise.blend_far)?;

    let range = storage.height_range();
    write_f32(writer, range.min)?;
    write_f32(writer, range.max)?;

    write_u32(writer, storage.region_count() as u32)?;
    for coord in storage.region_offsets() {
        write_i32(writer, coord.x)?;
        write_i32(writer, coord.y)?;
    }

    for kind in MapKind::ALL {
        for tile in storage.get_maps(kind) {
            if kind == MapKind::Height && storage.save_16_bit() {
                write_height_16(writer, tile, range)?;
            } else {
                writer.write_all(&tile.to_le_bytes())?;
            }
        }
    }
    debug!(
        "saved terrain layout: {} regions of {}px",
        storage.region_count(),
        storage.region_size().pixels()
    );
    Ok(())
}

/// Deserialize a terrain saved by [`save_to`], attaching a render backend.
pub fn load_from<R: Read>(
    reader: &mut R,
    backend: Box<dyn RenderBackend>,
) -> StorageResult<TerrainStorage> {
    let magic = read_bytes4(reader)?;
    if magic != MAGIC {
        return Err(StorageError::InvalidFormat("bad magic bytes".into()));
    }
    let version = read_f32(reader)?;
    let region_pixels = read_u32(reader)?;
    let region_size = RegionSize::from_pixels(region_pixels).ok_or_else(|| {
        StorageError::InvalidFormat(format!("unsupported region size {region_pixels}"))
    })?;
    let save_16_bit = read_u8(reader)? != 0;

    let noise = NoiseParams {
        enabled: read_u8(reader)? != 0,
        scale: read_f32(reader)?,
        height: read_f32(reader)?,
        blend_near: read_f32(reader)?,
        blend_far: read_f32(reader)?,
    };

    let range = HeightRange::new(read_f32(reader)?, read_f32(reader)?);

    let count = read_u32(reader)?;
    if count > MAX_REGIONS {
        return Err(StorageError::InvalidFormat(format!(
            "region count {count} exceeds grid capacity"
        )));
    }
    let mut coords = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let x = read_i32(reader)?;
        let y = read_i32(reader)?;
        coords.push(RegionCoord::new(x, y));
    }

    let config = StorageConfig {
        region_size,
        noise,
        save_16_bit,
        version,
        ..StorageConfig::default()
    };
    let mut storage = TerrainStorage::new(config, backend);
    storage.set_region_offsets(coords)?;

    for kind in MapKind::ALL {
        let mut tiles = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let tile = if kind == MapKind::Height && save_16_bit {
                read_height_16(reader, region_pixels, range)?
            } else {
                read_tile(reader, kind, region_pixels)?
            };
            tiles.push(tile);
        }
        storage.set_maps(kind, tiles)?;
    }

    // The recorded range is authoritative (exact for float saves, and the
    // dequantization basis for 16-bit saves).
    storage.set_height_range(range);
    Ok(storage)
}

fn write_height_16<W: Write>(
    writer: &mut W,
    tile: &RasterTile,
    range: HeightRange,
) -> StorageResult<()> {
    let span = range.span();
    for y in 0..tile.height() {
        for x in 0..tile.width() {
            let v = tile.get_pixel(x, y).r;
            let norm = if span > 0.0 { (v - range.min) / span } else { 0.0 };
            let q = (norm.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16;
            writer.write_all(&q.to_le_bytes())?;
        }
    }
    Ok(())
}

fn read_height_16<R: Read>(
    reader: &mut R,
    size: u32,
    range: HeightRange,
) -> StorageResult<RasterTile> {
    let count = (size * size) as usize;
    let mut bytes = vec![0u8; count * 2];
    reader.read_exact(&mut bytes)?;
    let span = range.span();
    let pixels: Vec<f32> = bytes
        .chunks_exact(2)
        .map(|c| {
            let q = u16::from_le_bytes([c[0], c[1]]);
            range.min + q as f32 / u16::MAX as f32 * span
        })
        .collect();
    let image = HeightImage::from_raw(size, size, pixels)
        .ok_or_else(|| StorageError::InvalidFormat("truncated height tile".into()))?;
    Ok(RasterTile::from_height_image(image))
}

fn read_tile<R: Read>(reader: &mut R, kind: MapKind, size: u32) -> StorageResult<RasterTile> {
    let count = (size * size) as usize;
    let mut bytes = vec![0u8; count * kind.format().bytes_per_pixel()];
    reader.read_exact(&mut bytes)?;
    match kind {
        MapKind::Height => {
            let pixels: Vec<f32> = bytes
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect();
            let image = HeightImage::from_raw(size, size, pixels)
                .ok_or_else(|| StorageError::InvalidFormat("truncated height tile".into()))?;
            Ok(RasterTile::from_height_image(image))
        }
        MapKind::Control | MapKind::Color => {
            let image = RgbaImage::from_raw(size, size, bytes)
                .ok_or_else(|| StorageError::InvalidFormat("truncated rgba tile".into()))?;
            Ok(RasterTile::from_rgba_image(image))
        }
    }
}

fn write_u32<W: Write>(w: &mut W, v: u32) -> StorageResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn write_i32<W: Write>(w: &mut W, v: i32) -> StorageResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn write_f32<W: Write>(w: &mut W, v: f32) -> StorageResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn read_bytes4<R: Read>(r: &mut R) -> StorageResult<[u8; 4]> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

fn read_u8<R: Read>(r: &mut R) -> StorageResult<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32<R: Read>(r: &mut R) -> StorageResult<u32> {
    Ok(u32::from_le_bytes(read_bytes4(r)?))
}

fn read_i32<R: Read>(r: &mut R) -> StorageResult<i32> {
    Ok(i32::from_le_bytes(read_bytes4(r)?))
}

fn read_f32<R: Read>(r: &mut R) -> StorageResult<f32> {
    Ok(f32::from_le_bytes(read_bytes4(r)?))
}
