//! Storage configuration: region size and scalar settings.

use crate::render::ResourceHandle;

use super::noise::NoiseParams;

/// Version written into the persisted layout.
pub const FORMAT_VERSION: f32 = 0.8;

/// Side length of a region's raster tiles, in pixels.
///
/// Restricted to a small power-of-two set; immutable once the first region
/// has been added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegionSize {
    Size64,
    Size128,
    Size256,
    Size512,
    #[default]
    Size1024,
    Size2048,
}

impl RegionSize {
    pub const ALL: [RegionSize; 6] = [
        RegionSize::Size64,
        RegionSize::Size128,
        RegionSize::Size256,
        RegionSize::Size512,
        RegionSize::Size1024,
        RegionSize::Size2048,
    ];

    /// Side length in pixels (= world units per region).
    pub const fn pixels(self) -> u32 {
        match self {
            RegionSize::Size64 => 64,
            RegionSize::Size128 => 128,
            RegionSize::Size256 => 256,
            RegionSize::Size512 => 512,
            RegionSize::Size1024 => 1024,
            RegionSize::Size2048 => 2048,
        }
    }

    /// Look up the enumerant for a pixel count; `None` for non-members.
    pub fn from_pixels(pixels: u32) -> Option<RegionSize> {
        RegionSize::ALL.iter().copied().find(|s| s.pixels() == pixels)
    }
}

/// Value-typed configuration passed to the storage at construction.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub region_size: RegionSize,
    pub noise: NoiseParams,
    pub shader_override_enabled: bool,
    /// Opaque handle to an override shader owned by the rendering backend.
    pub shader_override: Option<ResourceHandle>,
    /// Persist height data quantized to 16 bits over the height range.
    pub save_16_bit: bool,
    pub version: f32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            region_size: RegionSize::default(),
            noise: NoiseParams::default(),
            shader_override_enabled: false,
            shader_override: None,
            save_16_bit: false,
            version: FORMAT_VERSION,
        }
    }
}
