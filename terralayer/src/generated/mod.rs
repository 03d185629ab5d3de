//! Generated resource cache: dirty-tracked, render-ready artifacts.
//!
//! Each renderable artifact derived from the raw tiles (region index map,
//! blended region map, packed per-layer arrays, derived albedo/normal
//! arrays) has one [`GeneratedEntry`] in a fixed table. Mutations to the
//! registry or the tile store mark the affected entries dirty; the storage
//! facade rebuilds a dirty entry lazily on the next read and swaps the
//! backend handle.
//!
//! The builders in this module are pure assembly: they read the registry and
//! tile store and produce pixel buffers, leaving allocation to the
//! [`RenderBackend`](crate::render::RenderBackend).

mod types;

pub use types::{ArtifactKind, GeneratedEntry};

use image::imageops::{self, FilterType};
use tracing::debug;

use crate::coord::REGION_GRID_SIZE;
use crate::raster::{self, HeightImage, MapKind, RasterTile};
use crate::render::RenderBackend;
use crate::storage::{RegionRegistry, TileStore};

/// Side length of the blended region map.
pub const REGION_BLEND_MAP_SIZE: u32 = 512;

/// Fixed table of generated artifacts, one entry per [`ArtifactKind`].
#[derive(Debug, Default)]
pub struct GeneratedCache {
    entries: [GeneratedEntry; ArtifactKind::ALL.len()],
}

impl GeneratedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, kind: ArtifactKind) -> &GeneratedEntry {
        &self.entries[kind.slot()]
    }

    pub(crate) fn entry_mut(&mut self, kind: ArtifactKind) -> &mut GeneratedEntry {
        &mut self.entries[kind.slot()]
    }

    pub fn is_dirty(&self, kind: ArtifactKind) -> bool {
        self.entry(kind).is_dirty()
    }

    /// Mark one artifact stale. Does not rebuild.
    pub fn mark_dirty(&mut self, kind: ArtifactKind) {
        debug!("marking {} dirty", kind);
        self.entry_mut(kind).mark_dirty();
    }

    /// Mark every artifact sourced from one raster layer stale.
    pub fn mark_layer_dirty(&mut self, layer: MapKind) {
        for &kind in ArtifactKind::for_layer(layer) {
            self.mark_dirty(kind);
        }
    }

    /// Mark every artifact stale.
    pub fn mark_all_dirty(&mut self) {
        for kind in ArtifactKind::ALL {
            self.entry_mut(kind).mark_dirty();
        }
    }

    /// Release every resource and return all entries to the initial state.
    pub(crate) fn clear_all(&mut self, backend: &mut dyn RenderBackend) {
        for kind in ArtifactKind::ALL {
            self.entries[kind.slot()].clear(backend);
        }
    }
}

/// Build the region index map: one pixel per grid cell holding the dense
/// index + 1 of the region occupying it, 0 where empty.
pub fn build_region_map(registry: &RegionRegistry) -> RasterTile {
    let size = REGION_GRID_SIZE as u32;
    let mut image = HeightImage::new(size, size);
    for (index, coord) in registry.coords().iter().enumerate() {
        let (x, y) = coord.grid_cell();
        image.put_pixel(x, y, image::Luma([(index + 1) as f32]));
    }
    RasterTile::from_height_image(image)
}

/// Build the blended region map: the region presence mask upsampled to
/// [`REGION_BLEND_MAP_SIZE`] with bilinear smoothing, so the shader can fade
/// terrain out toward unregistered space.
pub fn build_region_blend_map(registry: &RegionRegistry) -> RasterTile {
    let size = REGION_GRID_SIZE as u32;
    let mut presence = HeightImage::new(size, size);
    for coord in registry.coords() {
        let (x, y) = coord.grid_cell();
        presence.put_pixel(x, y, image::Luma([1.0]));
    }
    let blended = imageops::resize(
        &presence,
        REGION_BLEND_MAP_SIZE,
        REGION_BLEND_MAP_SIZE,
        FilterType::Triangle,
    );
    RasterTile::from_height_image(blended)
}

/// Build the albedo layers: color tiles with the roughness alpha forced
/// opaque.
pub fn build_albedo_layers(store: &TileStore) -> Vec<RasterTile> {
    store
        .tiles(MapKind::Color)
        .iter()
        .map(|tile| {
            let mut albedo = tile.clone();
            for y in 0..albedo.height() {
                for x in 0..albedo.width() {
                    let mut p = albedo.get_pixel(x, y);
                    p.a = 1.0;
                    albedo.set_pixel(x, y, p);
                }
            }
            albedo
        })
        .collect()
}

/// Build the normal layers: one derived normal map per height tile.
pub fn build_normal_layers(store: &TileStore, spacing: f32) -> Vec<RasterTile> {
    store
        .tiles(MapKind::Height)
        .iter()
        .map(|tile| raster::normal_from_height(tile, spacing))
        .collect()
}
