//! The raster tile: a fixed-format square pixel buffer for one region and
//! one layer.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, Rgba, RgbaImage};

use super::types::{Pixel, PixelFormat};

/// Single-channel 32-bit float image buffer.
pub type HeightImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Backing storage of a raster tile, one variant per pixel format.
#[derive(Debug, Clone)]
enum TileData {
    Rf32(HeightImage),
    Rgba8(RgbaImage),
}

/// A fixed-size, fixed-format pixel buffer.
///
/// Tiles are owned by the tile store and mutated in place or replaced
/// wholesale. The buffer is backed by the `image` crate so import/export and
/// resampling reuse its machinery.
#[derive(Debug, Clone)]
pub struct RasterTile {
    data: TileData,
}

impl RasterTile {
    /// Create a tile of the given side length filled with one pixel value.
    pub fn filled(size: u32, format: PixelFormat, fill: Pixel) -> Self {
        let mut tile = match format {
            PixelFormat::Rf32 => Self {
                data: TileData::Rf32(HeightImage::new(size, size)),
            },
            PixelFormat::Rgba8 => Self {
                data: TileData::Rgba8(RgbaImage::new(size, size)),
            },
        };
        tile.fill(fill);
        tile
    }

    /// Wrap an existing single-channel float buffer.
    pub fn from_height_image(image: HeightImage) -> Self {
        Self {
            data: TileData::Rf32(image),
        }
    }

    /// Wrap an existing RGBA8 buffer.
    pub fn from_rgba_image(image: RgbaImage) -> Self {
        Self {
            data: TileData::Rgba8(image),
        }
    }

    pub fn format(&self) -> PixelFormat {
        match &self.data {
            TileData::Rf32(_) => PixelFormat::Rf32,
            TileData::Rgba8(_) => PixelFormat::Rgba8,
        }
    }

    pub fn width(&self) -> u32 {
        match &self.data {
            TileData::Rf32(img) => img.width(),
            TileData::Rgba8(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match &self.data {
            TileData::Rf32(img) => img.height(),
            TileData::Rgba8(img) => img.height(),
        }
    }

    /// Side length; equal to width for the square tiles this library stores.
    pub fn size(&self) -> u32 {
        self.width()
    }

    /// Whether this tile is the expected square size and format for a layer.
    pub fn matches(&self, format: PixelFormat, size: u32) -> bool {
        self.format() == format && self.width() == size && self.height() == size
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Pixel {
        match &self.data {
            TileData::Rf32(img) => {
                let Luma([v]) = *img.get_pixel(x, y);
                Pixel::new(v, 0.0, 0.0, 1.0)
            }
            TileData::Rgba8(img) => {
                let Rgba([r, g, b, a]) = *img.get_pixel(x, y);
                Pixel::new(
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                    a as f32 / 255.0,
                )
            }
        }
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        match &mut self.data {
            TileData::Rf32(img) => img.put_pixel(x, y, Luma([pixel.r])),
            TileData::Rgba8(img) => img.put_pixel(x, y, quantize(pixel)),
        }
    }

    /// Overwrite every pixel with one value.
    pub fn fill(&mut self, pixel: Pixel) {
        match &mut self.data {
            TileData::Rf32(img) => {
                for p in img.pixels_mut() {
                    *p = Luma([pixel.r]);
                }
            }
            TileData::Rgba8(img) => {
                let q = quantize(pixel);
                for p in img.pixels_mut() {
                    *p = q;
                }
            }
        }
    }

    /// Exact (min, max) over the float channel. `None` for RGBA8 tiles and
    /// for empty buffers.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        match &self.data {
            TileData::Rf32(img) => {
                let mut iter = img.as_raw().iter();
                let first = *iter.next()?;
                let mut min = first;
                let mut max = first;
                for &v in iter {
                    min = min.min(v);
                    max = max.max(v);
                }
                Some((min, max))
            }
            TileData::Rgba8(_) => None,
        }
    }

    /// Raw pixel data as little-endian bytes, row-major.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match &self.data {
            TileData::Rf32(img) => img
                .as_raw()
                .iter()
                .flat_map(|v| v.to_le_bytes())
                .collect(),
            TileData::Rgba8(img) => img.as_raw().clone(),
        }
    }

    /// Resampled copy at a new square size, preserving the pixel format.
    pub fn resized(&self, size: u32, filter: FilterType) -> RasterTile {
        match &self.data {
            TileData::Rf32(img) => {
                Self::from_height_image(imageops::resize(img, size, size, filter))
            }
            TileData::Rgba8(img) => {
                Self::from_rgba_image(imageops::resize(img, size, size, filter))
            }
        }
    }

    pub fn height_image(&self) -> Option<&HeightImage> {
        match &self.data {
            TileData::Rf32(img) => Some(img),
            TileData::Rgba8(_) => None,
        }
    }

    pub fn rgba_image(&self) -> Option<&RgbaImage> {
        match &self.data {
            TileData::Rf32(_) => None,
            TileData::Rgba8(img) => Some(img),
        }
    }
}

fn quantize(pixel: Pixel) -> Rgba<u8> {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([q(pixel.r), q(pixel.g), q(pixel.b), q(pixel.a)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_float_tile_reads_back_fill_value() {
        let tile = RasterTile::filled(8, PixelFormat::Rf32, Pixel::new(12.5, 0.0, 0.0, 1.0));
        assert_eq!(tile.get_pixel(0, 0).r, 12.5);
        assert_eq!(tile.get_pixel(7, 7).r, 12.5);
        assert_eq!(tile.min_max(), Some((12.5, 12.5)));
    }

    #[test]
    fn test_rgba_round_trip_within_quantization() {
        let mut tile = RasterTile::filled(4, PixelFormat::Rgba8, Pixel::ZERO);
        tile.set_pixel(1, 2, Pixel::new(1.0, 0.0, 1.0, 0.5));
        let p = tile.get_pixel(1, 2);
        assert_eq!(p.r, 1.0);
        assert_eq!(p.b, 1.0);
        assert!((p.a - 0.5).abs() < 1.0 / 255.0);
    }

    #[test]
    fn test_min_max_tracks_extremes() {
        let mut tile = RasterTile::filled(4, PixelFormat::Rf32, Pixel::BLACK);
        tile.set_pixel(0, 0, Pixel::new(-3.0, 0.0, 0.0, 1.0));
        tile.set_pixel(3, 3, Pixel::new(9.0, 0.0, 0.0, 1.0));
        assert_eq!(tile.min_max(), Some((-3.0, 9.0)));
    }

    #[test]
    fn test_min_max_undefined_for_rgba() {
        let tile = RasterTile::filled(4, PixelFormat::Rgba8, Pixel::WHITE);
        assert_eq!(tile.min_max(), None);
    }

    #[test]
    fn test_matches_rejects_wrong_size_and_format() {
        let tile = RasterTile::filled(64, PixelFormat::Rf32, Pixel::BLACK);
        assert!(tile.matches(PixelFormat::Rf32, 64));
        assert!(!tile.matches(PixelFormat::Rf32, 128));
        assert!(!tile.matches(PixelFormat::Rgba8, 64));
    }

    #[test]
    fn test_le_bytes_length() {
        let tile = RasterTile::filled(8, PixelFormat::Rf32, Pixel::BLACK);
        assert_eq!(tile.to_le_bytes().len(), 8 * 8 * 4);
        let tile = RasterTile::filled(8, PixelFormat::Rgba8, Pixel::BLACK);
        assert_eq!(tile.to_le_bytes().len(), 8 * 8 * 4);
    }
}
