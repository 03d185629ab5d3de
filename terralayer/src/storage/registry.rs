//! Sparse region registry: grid coordinate ↔ dense index.
//!
//! The ordered coordinate list is the authority for dense index assignment:
//! position `i` in the list is dense index `i` everywhere else (tile store
//! layers, packed array resources, persisted layout). Removal compacts the
//! index space, shifting every index above the removed one down by one.

use std::collections::HashSet;

use super::error::{StorageError, StorageResult};
use crate::coord::RegionCoord;

/// Ordered sparse mapping from region grid coordinates to dense indices.
#[derive(Debug, Default)]
pub struct RegionRegistry {
    offsets: Vec<RegionCoord>,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// The ordered coordinate list; position defines the dense index.
    pub fn coords(&self) -> &[RegionCoord] {
        &self.offsets
    }

    pub fn contains(&self, coord: RegionCoord) -> bool {
        self.index_of(coord).is_some()
    }

    /// Dense index of a coordinate. Stable until a removal shifts it.
    pub fn index_of(&self, coord: RegionCoord) -> Option<usize> {
        self.offsets.iter().position(|&c| c == coord)
    }

    /// Register a coordinate, appending it to the dense index space.
    pub fn add(&mut self, coord: RegionCoord) -> StorageResult<usize> {
        if !coord.in_grid() {
            return Err(StorageError::GridBoundsExceeded { coord });
        }
        if self.contains(coord) {
            return Err(StorageError::AlreadyExists { coord });
        }
        self.offsets.push(coord);
        Ok(self.offsets.len() - 1)
    }

    /// Unregister a coordinate, returning the dense index it occupied.
    ///
    /// Every dense index greater than the returned one shifts down by one;
    /// indices cached by callers across this call are invalid.
    pub fn remove(&mut self, coord: RegionCoord) -> StorageResult<usize> {
        let index = self
            .index_of(coord)
            .ok_or(StorageError::NotFound { coord })?;
        self.offsets.remove(index);
        Ok(index)
    }

    /// Rebuild the whole registry from an ordered coordinate sequence.
    ///
    /// Rejected wholesale, with no mutation, if any coordinate repeats or
    /// falls outside the grid.
    pub fn replace_all(&mut self, coords: Vec<RegionCoord>) -> StorageResult<()> {
        let mut seen = HashSet::with_capacity(coords.len());
        for &coord in &coords {
            if !coord.in_grid() {
                return Err(StorageError::GridBoundsExceeded { coord });
            }
            if !seen.insert(coord) {
                return Err(StorageError::DuplicateCoordinate { coord });
            }
        }
        self.offsets = coords;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_dense_indices_in_order() {
        let mut registry = RegionRegistry::new();
        assert_eq!(registry.add(RegionCoord::new(0, 0)).unwrap(), 0);
        assert_eq!(registry.add(RegionCoord::new(1, 0)).unwrap(), 1);
        assert_eq!(registry.add(RegionCoord::new(-3, 2)).unwrap(), 2);
        assert_eq!(registry.index_of(RegionCoord::new(1, 0)), Some(1));
    }

    #[test]
    fn test_duplicate_add_rejected() {
        let mut registry = RegionRegistry::new();
        registry.add(RegionCoord::new(2, 2)).unwrap();
        let err = registry.add(RegionCoord::new(2, 2)).unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));
        assert_eq!(registry.len(), 1, "failed add must not mutate");
    }

    #[test]
    fn test_out_of_grid_add_rejected() {
        let mut registry = RegionRegistry::new();
        let err = registry.add(RegionCoord::new(8, 0)).unwrap_err();
        assert!(matches!(err, StorageError::GridBoundsExceeded { .. }));
    }

    #[test]
    fn test_remove_compacts_indices() {
        let mut registry = RegionRegistry::new();
        registry.add(RegionCoord::new(0, 0)).unwrap();
        registry.add(RegionCoord::new(1, 0)).unwrap();
        registry.add(RegionCoord::new(2, 0)).unwrap();

        assert_eq!(registry.remove(RegionCoord::new(0, 0)).unwrap(), 0);
        // The prior index-2 region is now addressable at index 1.
        assert_eq!(registry.index_of(RegionCoord::new(2, 0)), Some(1));
        assert_eq!(registry.index_of(RegionCoord::new(1, 0)), Some(0));
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let mut registry = RegionRegistry::new();
        let err = registry.remove(RegionCoord::new(5, 5)).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn test_replace_all_rejects_duplicates_wholesale() {
        let mut registry = RegionRegistry::new();
        registry.add(RegionCoord::new(0, 0)).unwrap();

        let err = registry
            .replace_all(vec![
                RegionCoord::new(1, 1),
                RegionCoord::new(2, 2),
                RegionCoord::new(1, 1),
            ])
            .unwrap_err();
        assert!(matches!(err, StorageError::DuplicateCoordinate { .. }));
        // Prior content untouched.
        assert_eq!(registry.coords(), &[RegionCoord::new(0, 0)]);
    }

    #[test]
    fn test_replace_all_defines_index_order() {
        let mut registry = RegionRegistry::new();
        registry
            .replace_all(vec![RegionCoord::new(3, 3), RegionCoord::new(-1, 0)])
            .unwrap();
        assert_eq!(registry.index_of(RegionCoord::new(3, 3)), Some(0));
        assert_eq!(registry.index_of(RegionCoord::new(-1, 0)), Some(1));
    }
}
