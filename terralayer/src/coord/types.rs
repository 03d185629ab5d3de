//! Coordinate types for the terrain plane and the region grid.

use std::fmt;

/// Side length of the fixed region grid.
///
/// Valid region coordinates lie in `[-8, 8)` on both axes, giving at most
/// 256 addressable regions.
pub const REGION_GRID_SIZE: i32 = 16;

/// Half of [`REGION_GRID_SIZE`]; offset applied to map a region coordinate
/// into an unsigned grid cell.
pub const REGION_GRID_HALF: i32 = REGION_GRID_SIZE / 2;

/// A position on the terrain plane (the horizontal axes of world space).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPos {
    pub x: f32,
    pub z: f32,
}

impl WorldPos {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }
}

/// Integer coordinate of one region's cell on the bounded region grid.
///
/// Two coordinates are equal iff both components match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionCoord {
    pub x: i32,
    pub y: i32,
}

impl RegionCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether this coordinate falls inside the fixed region grid.
    pub fn in_grid(&self) -> bool {
        (-REGION_GRID_HALF..REGION_GRID_HALF).contains(&self.x)
            && (-REGION_GRID_HALF..REGION_GRID_HALF).contains(&self.y)
    }

    /// Unsigned grid cell of this coordinate, for indexing the region map.
    ///
    /// Only meaningful when [`in_grid`](Self::in_grid) holds.
    pub fn grid_cell(&self) -> (u32, u32) {
        (
            (self.x + REGION_GRID_HALF) as u32,
            (self.y + REGION_GRID_HALF) as u32,
        )
    }
}

impl fmt::Display for RegionCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coords_equal_iff_components_match() {
        assert_eq!(RegionCoord::new(3, -4), RegionCoord::new(3, -4));
        assert_ne!(RegionCoord::new(3, -4), RegionCoord::new(-4, 3));
    }

    #[test]
    fn test_grid_membership_bounds() {
        assert!(RegionCoord::new(-8, -8).in_grid());
        assert!(RegionCoord::new(7, 7).in_grid());
        assert!(!RegionCoord::new(8, 0).in_grid());
        assert!(!RegionCoord::new(0, -9).in_grid());
    }

    #[test]
    fn test_grid_cell_offsets_into_unsigned_space() {
        assert_eq!(RegionCoord::new(-8, -8).grid_cell(), (0, 0));
        assert_eq!(RegionCoord::new(0, 0).grid_cell(), (8, 8));
        assert_eq!(RegionCoord::new(7, 7).grid_cell(), (15, 15));
    }
}
