//! Raster sanitizer: normalize externally supplied tiles into a layer's
//! expected format.
//!
//! Partial and legacy imports are expected, so malformed input is never an
//! error here. Absent or wrong-format candidates degrade to default-filled
//! tiles and the normalization is logged.

use tracing::warn;

use super::tile::RasterTile;
use super::types::MapKind;

/// Normalize a single candidate tile for a layer.
///
/// Passes well-formed tiles through unchanged; substitutes a default-filled
/// tile (and logs) when the candidate is absent, the wrong size, or the
/// wrong pixel format.
pub fn sanitize_tile(kind: MapKind, region_size: u32, candidate: Option<RasterTile>) -> RasterTile {
    match candidate {
        Some(tile) if tile.matches(kind.format(), region_size) => tile,
        Some(tile) => {
            warn!(
                "replacing malformed {} map: expected {}x{} {:?}, got {}x{} {:?}",
                kind,
                region_size,
                region_size,
                kind.format(),
                tile.width(),
                tile.height(),
                tile.format(),
            );
            RasterTile::filled(region_size, kind.format(), kind.default_fill())
        }
        None => RasterTile::filled(region_size, kind.format(), kind.default_fill()),
    }
}

/// Normalize an ordered candidate sequence to exactly `required_len` tiles.
///
/// Each candidate goes through [`sanitize_tile`]; short input is padded with
/// default-filled tiles and surplus entries are dropped (logged).
pub fn sanitize_tiles(
    kind: MapKind,
    region_size: u32,
    candidates: Vec<RasterTile>,
    required_len: usize,
) -> Vec<RasterTile> {
    if candidates.len() > required_len {
        warn!(
            "dropping {} surplus {} maps (expected {})",
            candidates.len() - required_len,
            kind,
            required_len,
        );
    }
    let mut candidates = candidates.into_iter();
    (0..required_len)
        .map(|_| sanitize_tile(kind, region_size, candidates.next()))
        .collect()
}
