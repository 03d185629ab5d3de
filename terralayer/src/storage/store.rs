//! Tile store: the three layer sequences behind one invariant-guarding type.
//!
//! All three sequences always have identical length and identical index
//! meaning; dense index `i` refers to the same region in every layer. Every
//! mutation path goes through methods of this type so the lockstep invariant
//! cannot be broken from outside.

use std::mem;

use super::error::{StorageError, StorageResult};
use crate::raster::{MapKind, RasterTile};

/// Index-aligned per-layer tile sequences.
#[derive(Debug, Default)]
pub struct TileStore {
    height: Vec<RasterTile>,
    control: Vec<RasterTile>,
    color: Vec<RasterTile>,
}

impl TileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        debug_assert!(
            self.height.len() == self.control.len() && self.control.len() == self.color.len(),
            "layer sequences out of lockstep"
        );
        self.height.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn layer(&self, kind: MapKind) -> &Vec<RasterTile> {
        match kind {
            MapKind::Height => &self.height,
            MapKind::Control => &self.control,
            MapKind::Color => &self.color,
        }
    }

    fn layer_mut(&mut self, kind: MapKind) -> &mut Vec<RasterTile> {
        match kind {
            MapKind::Height => &mut self.height,
            MapKind::Control => &mut self.control,
            MapKind::Color => &mut self.color,
        }
    }

    /// Append one region's tiles, in [`MapKind::ALL`] order.
    pub fn push(&mut self, tiles: [RasterTile; 3]) {
        let [height, control, color] = tiles;
        self.height.push(height);
        self.control.push(control);
        self.color.push(color);
    }

    /// Remove one dense index from every layer, shifting higher indices down.
    pub fn remove(&mut self, index: usize) -> StorageResult<()> {
        if index >= self.len() {
            return Err(StorageError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        self.height.remove(index);
        self.control.remove(index);
        self.color.remove(index);
        Ok(())
    }

    /// Replace a single tile, returning the previous one.
    pub fn replace(
        &mut self,
        kind: MapKind,
        index: usize,
        tile: RasterTile,
    ) -> StorageResult<RasterTile> {
        let len = self.len();
        let slot = self
            .layer_mut(kind)
            .get_mut(index)
            .ok_or(StorageError::IndexOutOfRange { index, len })?;
        Ok(mem::replace(slot, tile))
    }

    pub fn tile(&self, kind: MapKind, index: usize) -> StorageResult<&RasterTile> {
        self.layer(kind)
            .get(index)
            .ok_or(StorageError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// The ordered tile sequence for one layer.
    pub fn tiles(&self, kind: MapKind) -> &[RasterTile] {
        self.layer(kind)
    }

    /// Replace one layer wholesale. The input length must already equal the
    /// store length; bulk callers validate with `CountMismatch` beforehand.
    pub fn set_all(&mut self, kind: MapKind, tiles: Vec<RasterTile>) {
        debug_assert_eq!(tiles.len(), self.len(), "bulk set must keep lockstep");
        *self.layer_mut(kind) = tiles;
    }

    /// Grow or shrink every layer to `len`, padding with layer defaults.
    pub fn resize_with_defaults(&mut self, len: usize, region_size: u32) {
        for kind in MapKind::ALL {
            let layer = self.layer_mut(kind);
            layer.truncate(len);
            while layer.len() < len {
                layer.push(RasterTile::filled(
                    region_size,
                    kind.format(),
                    kind.default_fill(),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{Pixel, PixelFormat};

    fn region_tiles(size: u32) -> [RasterTile; 3] {
        [
            RasterTile::filled(size, PixelFormat::Rf32, Pixel::BLACK),
            RasterTile::filled(size, PixelFormat::Rgba8, Pixel::BLACK),
            RasterTile::filled(size, PixelFormat::Rgba8, Pixel::ROUGHNESS_DEFAULT),
        ]
    }

    #[test]
    fn test_push_and_remove_keep_layers_in_lockstep() {
        let mut store = TileStore::new();
        store.push(region_tiles(64));
        store.push(region_tiles(64));
        assert_eq!(store.len(), 2);
        for kind in MapKind::ALL {
            assert_eq!(store.tiles(kind).len(), 2);
        }

        store.remove(0).unwrap();
        assert_eq!(store.len(), 1);
        for kind in MapKind::ALL {
            assert_eq!(store.tiles(kind).len(), 1);
        }
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut store = TileStore::new();
        let err = store.remove(0).unwrap_err();
        assert!(matches!(
            err,
            StorageError::IndexOutOfRange { index: 0, len: 0 }
        ));
    }

    #[test]
    fn test_replace_returns_previous_tile() {
        let mut store = TileStore::new();
        store.push(region_tiles(64));
        let new = RasterTile::filled(64, PixelFormat::Rf32, Pixel::new(7.0, 0.0, 0.0, 1.0));
        let old = store.replace(MapKind::Height, 0, new).unwrap();
        assert_eq!(old.get_pixel(0, 0).r, 0.0);
        assert_eq!(store.tile(MapKind::Height, 0).unwrap().get_pixel(0, 0).r, 7.0);
    }

    #[test]
    fn test_resize_pads_with_layer_defaults() {
        let mut store = TileStore::new();
        store.resize_with_defaults(2, 64);
        assert_eq!(store.len(), 2);
        assert!(store
            .tile(MapKind::Height, 1)
            .unwrap()
            .matches(PixelFormat::Rf32, 64));
        let color = store.tile(MapKind::Color, 1).unwrap().get_pixel(0, 0);
        assert_eq!((color.r, color.g, color.b), (1.0, 1.0, 1.0));

        store.resize_with_defaults(0, 64);
        assert!(store.is_empty());
    }
}
