//! Raster tiles and their normalization.
//!
//! A raster tile is a square, fixed-format pixel buffer holding one region's
//! data for one layer. The sanitizer is the single entry point for externally
//! supplied tiles: it substitutes logged defaults for anything absent or
//! malformed rather than propagating errors, because partial and legacy
//! imports are expected.

mod derive;
mod sanitize;
mod tile;
mod types;

pub use derive::{normal_from_height, thumbnail};
pub use sanitize::{sanitize_tile, sanitize_tiles};
pub use tile::{HeightImage, RasterTile};
pub use types::{MapKind, Pixel, PixelFormat};
