//! Coordinate conversion module.
//!
//! Provides conversions between world positions on the terrain plane and
//! region grid coordinates / local pixel offsets. Regions are axis-aligned
//! squares of `region_size` world units, so the conversions are a floor
//! division (region) and a Euclidean remainder (pixel within the region).

mod types;

pub use types::{RegionCoord, WorldPos, REGION_GRID_HALF, REGION_GRID_SIZE};

/// Converts a world position to the region grid coordinate containing it.
///
/// Both components floor toward negative infinity, so positions at negative
/// world coordinates map into negative region cells rather than clustering
/// around zero.
#[inline]
pub fn region_coord_of(world: WorldPos, region_size: u32) -> RegionCoord {
    let size = region_size as f32;
    RegionCoord::new(
        (world.x / size).floor() as i32,
        (world.z / size).floor() as i32,
    )
}

/// Converts a world position to the local pixel offset within its region.
///
/// The offset is the Euclidean remainder of the floored world position by the
/// region size, so it is always in `0..region_size` regardless of sign.
#[inline]
pub fn pixel_offset_of(world: WorldPos, region_size: u32) -> (u32, u32) {
    let size = region_size as i64;
    let px = world.x.floor() as i64;
    let pz = world.z.floor() as i64;
    (px.rem_euclid(size) as u32, pz.rem_euclid(size) as u32)
}
