//! Layer kinds, pixel formats and the normalized pixel value type.

use std::fmt;

/// The three raster layers every region carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    /// Elevation in world units, single 32-bit float channel.
    Height,
    /// Paint/control data, four 8-bit channels.
    Control,
    /// Albedo color with roughness in the alpha channel, four 8-bit channels.
    Color,
}

impl MapKind {
    pub const ALL: [MapKind; 3] = [MapKind::Height, MapKind::Control, MapKind::Color];

    /// The fixed pixel format of this layer.
    pub fn format(self) -> PixelFormat {
        match self {
            MapKind::Height => PixelFormat::Rf32,
            MapKind::Control | MapKind::Color => PixelFormat::Rgba8,
        }
    }

    /// The default fill pixel for freshly created or normalized tiles.
    pub fn default_fill(self) -> Pixel {
        match self {
            MapKind::Height | MapKind::Control => Pixel::BLACK,
            MapKind::Color => Pixel::ROUGHNESS_DEFAULT,
        }
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MapKind::Height => "height",
            MapKind::Control => "control",
            MapKind::Color => "color",
        };
        f.write_str(name)
    }
}

/// Pixel storage format of a raster tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single-channel 32-bit float.
    Rf32,
    /// Four 8-bit channels.
    Rgba8,
}

impl PixelFormat {
    /// Bytes occupied by one pixel.
    pub fn bytes_per_pixel(self) -> usize {
        4
    }
}

/// A pixel value with normalized float channels.
///
/// For single-channel formats the value lives in `r` and the remaining
/// channels read as `(0, 0, 1)`, matching how a red-only texture samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pixel {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Pixel {
    /// Fully transparent black; the defined result for queries over
    /// unregistered terrain.
    pub const ZERO: Pixel = Pixel::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Pixel = Pixel::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Pixel = Pixel::new(1.0, 1.0, 1.0, 1.0);
    /// White albedo with half roughness in the alpha channel; default fill
    /// for color tiles.
    pub const ROUGHNESS_DEFAULT: Pixel = Pixel::new(1.0, 1.0, 1.0, 0.5);
    /// A flat "straight up" tangent-space normal.
    pub const NORMAL_UP: Pixel = Pixel::new(0.5, 0.5, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_formats_are_fixed() {
        assert_eq!(MapKind::Height.format(), PixelFormat::Rf32);
        assert_eq!(MapKind::Control.format(), PixelFormat::Rgba8);
        assert_eq!(MapKind::Color.format(), PixelFormat::Rgba8);
    }

    #[test]
    fn test_default_fills() {
        assert_eq!(MapKind::Height.default_fill(), Pixel::BLACK);
        assert_eq!(MapKind::Control.default_fill(), Pixel::BLACK);
        assert_eq!(MapKind::Color.default_fill(), Pixel::ROUGHNESS_DEFAULT);
    }
}
