//! Terrain storage facade.
//!
//! [`TerrainStorage`] owns the region registry, the tile store, the height
//! range and the generated resource cache, and is the single unit of
//! mutation: every operation that changes one of them updates the others
//! within the same call, so the aggregate never desynchronizes. All
//! structural errors abort with no partial mutation.
//!
//! Single-threaded cooperative model: all mutation happens through
//! `&mut self` on the owning thread, with no internal locking.

pub mod error;
mod registry;
mod store;

pub use error::{StorageError, StorageResult};
pub use registry::RegionRegistry;
pub use store::TileStore;

use tracing::{debug, info, warn};

use crate::config::{NoiseParams, RegionSize, StorageConfig};
use crate::coord::{self, RegionCoord, WorldPos};
use crate::generated::{self, ArtifactKind, GeneratedCache};
use crate::height_range::HeightRange;
use crate::raster::{self, MapKind, Pixel, RasterTile};
use crate::render::{RenderBackend, ResourceHandle};

/// Authoritative raster storage for one terrain.
pub struct TerrainStorage {
    config: StorageConfig,
    registry: RegionRegistry,
    store: TileStore,
    height_range: HeightRange,
    cache: GeneratedCache,
    backend: Box<dyn RenderBackend>,
}

impl std::fmt::Debug for TerrainStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainStorage")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("store", &self.store)
            .field("height_range", &self.height_range)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl TerrainStorage {
    pub fn new(config: StorageConfig, backend: Box<dyn RenderBackend>) -> Self {
        Self {
            config,
            registry: RegionRegistry::new(),
            store: TileStore::new(),
            height_range: HeightRange::ZERO,
            cache: GeneratedCache::new(),
            backend,
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn region_size(&self) -> RegionSize {
        self.config.region_size
    }

    /// Change the region size. Ignored (with a warning) once regions exist,
    /// since stored tiles are sized to the current setting.
    pub fn set_region_size(&mut self, size: RegionSize) {
        if !self.registry.is_empty() {
            warn!(
                "ignoring region size change to {} with {} regions stored",
                size.pixels(),
                self.registry.len()
            );
            return;
        }
        self.config.region_size = size;
    }

    fn region_pixels(&self) -> u32 {
        self.config.region_size.pixels()
    }

    // === Region operations =================================================

    pub fn region_count(&self) -> usize {
        self.registry.len()
    }

    /// The ordered coordinate list; position defines the dense index.
    pub fn region_offsets(&self) -> &[RegionCoord] {
        self.registry.coords()
    }

    pub fn has_region(&self, world: WorldPos) -> bool {
        self.get_region_index(world).is_some()
    }

    /// Dense index of the region containing a world position. Stable until a
    /// removal shifts it.
    pub fn get_region_index(&self, world: WorldPos) -> Option<usize> {
        let coord = coord::region_coord_of(world, self.region_pixels());
        self.registry.index_of(coord)
    }

    /// Register the region containing `world` with default-filled tiles.
    pub fn add_region(&mut self, world: WorldPos) -> StorageResult<usize> {
        self.add_region_with_maps(world, Vec::new())
    }

    /// Register the region containing `world`, seeded with candidate tiles
    /// in `[height, control, color]` order. Absent or malformed candidates
    /// are sanitized to layer defaults.
    ///
    /// Fails with `AlreadyExists` or `GridBoundsExceeded` before any state
    /// changes; on success all three layers, the height range and the dirty
    /// flags are updated together.
    pub fn add_region_with_maps(
        &mut self,
        world: WorldPos,
        maps: Vec<RasterTile>,
    ) -> StorageResult<usize> {
        let coord = coord::region_coord_of(world, self.region_pixels());
        let index = self.registry.add(coord)?;

        let size = self.region_pixels();
        let mut maps = maps.into_iter();
        let tiles = [
            raster::sanitize_tile(MapKind::Height, size, maps.next()),
            raster::sanitize_tile(MapKind::Control, size, maps.next()),
            raster::sanitize_tile(MapKind::Color, size, maps.next()),
        ];

        if let Some((min, max)) = tiles[0].min_max() {
            self.height_range.widen(HeightRange::new(min, max));
        }
        self.store.push(tiles);
        self.cache.mark_all_dirty();
        debug!("added region {} at dense index {}", coord, index);
        Ok(index)
    }

    /// Unregister the region containing `world`, destroying its tiles.
    ///
    /// Compacts the dense index space: indices above the removed one shift
    /// down by one, invalidating indices cached by callers. The height range
    /// is fully recomputed, since removal can shrink the true range.
    pub fn remove_region(&mut self, world: WorldPos) -> StorageResult<()> {
        let coord = coord::region_coord_of(world, self.region_pixels());
        let index = self.registry.remove(coord)?;
        // Cannot fail: the registry and store share one index space.
        self.store.remove(index)?;
        self.cache.mark_all_dirty();
        self.recompute_height_range();
        debug!("removed region {} from dense index {}", coord, index);
        Ok(())
    }

    /// Rebuild the registry from an ordered coordinate sequence (dense index
    /// assignment follows the sequence order, as in the persisted layout).
    ///
    /// Rejected wholesale on duplicates or out-of-grid coordinates. On
    /// success the layer sequences are resized with default tiles to keep
    /// the lockstep invariant; callers then overwrite them via
    /// [`set_maps`](Self::set_maps).
    pub fn set_region_offsets(&mut self, coords: Vec<RegionCoord>) -> StorageResult<()> {
        self.registry.replace_all(coords)?;
        let len = self.registry.len();
        let size = self.region_pixels();
        self.store.resize_with_defaults(len, size);
        self.cache.mark_all_dirty();
        self.recompute_height_range();
        Ok(())
    }

    // === Map operations ====================================================

    /// Replace one tile in place.
    ///
    /// The candidate is sanitized to the layer format first. Height edits
    /// take the O(1) incremental path: the tracked range widens to the new
    /// tile's extremes but never narrows, even if the edit removed the prior
    /// minimum or maximum.
    pub fn set_map_region(
        &mut self,
        kind: MapKind,
        index: usize,
        tile: RasterTile,
    ) -> StorageResult<()> {
        let len = self.store.len();
        if index >= len {
            return Err(StorageError::IndexOutOfRange { index, len });
        }
        let tile = raster::sanitize_tile(kind, self.region_pixels(), Some(tile));
        if kind == MapKind::Height {
            if let Some((min, max)) = tile.min_max() {
                self.height_range.widen(HeightRange::new(min, max));
            }
        }
        self.store.replace(kind, index, tile)?;
        self.cache.mark_layer_dirty(kind);
        Ok(())
    }

    pub fn get_map_region(&self, kind: MapKind, index: usize) -> StorageResult<&RasterTile> {
        self.store.tile(kind, index)
    }

    /// Replace one layer wholesale.
    ///
    /// The input length must equal the current region count
    /// (`CountMismatch` otherwise); every element is sanitized. A height
    /// layer replacement triggers a full range recompute, since bulk
    /// replacement can shrink the true range.
    pub fn set_maps(&mut self, kind: MapKind, maps: Vec<RasterTile>) -> StorageResult<()> {
        let expected = self.region_count();
        if maps.len() != expected {
            return Err(StorageError::CountMismatch {
                expected,
                actual: maps.len(),
            });
        }
        let tiles = raster::sanitize_tiles(kind, self.region_pixels(), maps, expected);
        self.store.set_all(kind, tiles);
        self.cache.mark_layer_dirty(kind);
        if kind == MapKind::Height {
            self.recompute_height_range();
        }
        Ok(())
    }

    /// The ordered tile sequence for one layer.
    pub fn get_maps(&self, kind: MapKind) -> &[RasterTile] {
        self.store.tiles(kind)
    }

    pub fn get_maps_copy(&self, kind: MapKind) -> Vec<RasterTile> {
        self.store.tiles(kind).to_vec()
    }

    /// Normalize a candidate sequence against this storage's layer format
    /// and region count. Never fails; see [`raster::sanitize_tiles`].
    pub fn sanitize_maps(&self, kind: MapKind, maps: Vec<RasterTile>) -> Vec<RasterTile> {
        raster::sanitize_tiles(kind, self.region_pixels(), maps, self.region_count())
    }

    /// Mark generated artifacts stale without rebuilding: those sourced from
    /// one layer, or every artifact when `layer` is `None`.
    pub fn force_update_maps(&mut self, layer: Option<MapKind>) {
        match layer {
            Some(kind) => self.cache.mark_layer_dirty(kind),
            None => self.cache.mark_all_dirty(),
        }
    }

    // === Height range ======================================================

    pub fn height_range(&self) -> HeightRange {
        self.height_range
    }

    /// Explicit external override of the tracked range, for callers holding
    /// authoritative bounds (e.g. import metadata).
    pub fn set_height_range(&mut self, range: HeightRange) {
        self.height_range = range;
    }

    /// Widen the tracked range to include one height value.
    pub fn update_heights(&mut self, height: f32) {
        self.height_range.widen_scalar(height);
    }

    /// Widen the tracked range to include another range.
    pub fn update_heights_range(&mut self, range: HeightRange) {
        self.height_range.widen(range);
    }

    /// Exact recompute: scan every pixel of every height tile.
    ///
    /// Callers invoke this after operations where incremental widening is
    /// insufficient; [`remove_region`](Self::remove_region) and height
    /// [`set_maps`](Self::set_maps) already do so internally.
    pub fn update_height_range(&mut self) {
        self.recompute_height_range();
    }

    fn recompute_height_range(&mut self) {
        let mut range: Option<HeightRange> = None;
        for tile in self.store.tiles(MapKind::Height) {
            if let Some((min, max)) = tile.min_max() {
                match &mut range {
                    Some(r) => r.widen(HeightRange::new(min, max)),
                    None => range = Some(HeightRange::new(min, max)),
                }
            }
        }
        self.height_range = range.unwrap_or(HeightRange::ZERO);
    }

    // === Pixel queries =====================================================

    /// Read one pixel of one layer at a world position.
    ///
    /// Returns [`Pixel::ZERO`] when no region is registered there; sampling
    /// over unregistered space is a normal occurrence at world edges, not an
    /// error.
    pub fn get_pixel(&self, kind: MapKind, world: WorldPos) -> Pixel {
        let Some(index) = self.get_region_index(world) else {
            return Pixel::ZERO;
        };
        let (x, y) = coord::pixel_offset_of(world, self.region_pixels());
        self.store.tiles(kind)[index].get_pixel(x, y)
    }

    /// Elevation at a world position: the height layer's red channel.
    pub fn get_height(&self, world: WorldPos) -> f32 {
        self.get_pixel(MapKind::Height, world).r
    }

    pub fn get_control(&self, world: WorldPos) -> Pixel {
        self.get_pixel(MapKind::Control, world)
    }

    /// Albedo at a world position: the color layer with the roughness alpha
    /// replaced by opaque.
    pub fn get_color(&self, world: WorldPos) -> Pixel {
        let mut pixel = self.get_pixel(MapKind::Color, world);
        pixel.a = 1.0;
        pixel
    }

    /// Roughness at a world position: the color layer's alpha channel.
    pub fn get_roughness(&self, world: WorldPos) -> f32 {
        self.get_pixel(MapKind::Color, world).a
    }

    // === Generated resources ===============================================

    /// Whether an artifact is stale relative to its source data.
    pub fn is_artifact_dirty(&self, kind: ArtifactKind) -> bool {
        self.cache.is_dirty(kind)
    }

    /// Backend handle for an artifact, rebuilding it first if stale.
    ///
    /// A clean entry's resource always reflects the registry/tile-store
    /// state as of the last mutation that marked it dirty; repeated reads
    /// between two dirty marks reuse the same resource.
    pub fn generated_handle(&mut self, kind: ArtifactKind) -> ResourceHandle {
        match (self.cache.is_dirty(kind), self.cache.entry(kind).handle()) {
            (false, Some(handle)) => handle,
            _ => self.rebuild(kind),
        }
    }

    /// Handle of the blended region map (rebuilding if stale).
    pub fn region_blend_map(&mut self) -> ResourceHandle {
        self.generated_handle(ArtifactKind::RegionBlendMap)
    }

    /// The cached source image of an artifact, where one exists (the region
    /// map and blend map keep theirs; array artifacts do not).
    pub fn generated_image(&self, kind: ArtifactKind) -> Option<&RasterTile> {
        self.cache.entry(kind).image()
    }

    fn rebuild(&mut self, kind: ArtifactKind) -> ResourceHandle {
        debug!("rebuilding {}", kind);
        let (handle, image) = match kind {
            ArtifactKind::RegionMap => {
                let image = generated::build_region_map(&self.registry);
                let handle = self.backend.create_texture("terrain region map", &image);
                (handle, Some(image))
            }
            ArtifactKind::RegionBlendMap => {
                let image = generated::build_region_blend_map(&self.registry);
                let handle = self
                    .backend
                    .create_texture("terrain region blend map", &image);
                (handle, Some(image))
            }
            ArtifactKind::HeightArray => {
                let handle = self
                    .backend
                    .create_texture_array("terrain height maps", self.store.tiles(MapKind::Height));
                (handle, None)
            }
            ArtifactKind::ControlArray => {
                let handle = self.backend.create_texture_array(
                    "terrain control maps",
                    self.store.tiles(MapKind::Control),
                );
                (handle, None)
            }
            ArtifactKind::ColorArray => {
                let handle = self
                    .backend
                    .create_texture_array("terrain color maps", self.store.tiles(MapKind::Color));
                (handle, None)
            }
            ArtifactKind::AlbedoArray => {
                let layers = generated::build_albedo_layers(&self.store);
                let handle = self
                    .backend
                    .create_texture_array("terrain albedo maps", &layers);
                (handle, None)
            }
            ArtifactKind::NormalArray => {
                let layers = generated::build_normal_layers(&self.store, 1.0);
                let handle = self
                    .backend
                    .create_texture_array("terrain normal maps", &layers);
                (handle, None)
            }
        };
        self.cache
            .entry_mut(kind)
            .install(self.backend.as_mut(), handle, image);
        handle
    }

    // === Configuration =====================================================

    pub fn noise(&self) -> &NoiseParams {
        &self.config.noise
    }

    pub fn set_noise_enabled(&mut self, enabled: bool) {
        self.config.noise.enabled = enabled;
    }

    pub fn set_noise_scale(&mut self, scale: f32) {
        self.config.noise.scale = scale;
    }

    pub fn set_noise_height(&mut self, height: f32) {
        self.config.noise.height = height;
    }

    pub fn set_noise_blend_near(&mut self, near: f32) {
        self.config.noise.blend_near = near.clamp(0.0, 1.0);
    }

    pub fn set_noise_blend_far(&mut self, far: f32) {
        self.config.noise.blend_far = far.clamp(0.0, 1.0);
    }

    pub fn is_shader_override_enabled(&self) -> bool {
        self.config.shader_override_enabled
    }

    pub fn enable_shader_override(&mut self, enabled: bool) {
        self.config.shader_override_enabled = enabled;
    }

    pub fn shader_override(&self) -> Option<ResourceHandle> {
        self.config.shader_override
    }

    pub fn set_shader_override(&mut self, shader: Option<ResourceHandle>) {
        self.config.shader_override = shader;
    }

    pub fn save_16_bit(&self) -> bool {
        self.config.save_16_bit
    }

    pub fn set_save_16_bit(&mut self, enabled: bool) {
        self.config.save_16_bit = enabled;
    }

    pub fn version(&self) -> f32 {
        self.config.version
    }

    // === Maintenance =======================================================

    /// Log a summary of the stored state for debugging.
    pub fn audit(&self) {
        info!(
            "terrain storage: {} regions of {}px, height range [{}, {}]",
            self.region_count(),
            self.region_pixels(),
            self.height_range.min,
            self.height_range.max,
        );
        for kind in ArtifactKind::ALL {
            info!(
                "  {}: dirty={} resident={}",
                kind,
                self.cache.is_dirty(kind),
                self.cache.entry(kind).handle().is_some(),
            );
        }
    }

    /// Drop every region and release every generated resource.
    pub fn clear(&mut self) {
        self.registry = RegionRegistry::new();
        self.store = TileStore::new();
        self.height_range = HeightRange::ZERO;
        self.cache.clear_all(self.backend.as_mut());
    }
}

impl Drop for TerrainStorage {
    fn drop(&mut self) {
        self.cache.clear_all(self.backend.as_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixelFormat;
    use crate::render::NullRenderBackend;

    fn storage(size: RegionSize) -> TerrainStorage {
        let config = StorageConfig {
            region_size: size,
            ..StorageConfig::default()
        };
        TerrainStorage::new(config, Box::new(NullRenderBackend::default()))
    }

    fn uniform_height(size: u32, value: f32) -> RasterTile {
        RasterTile::filled(size, PixelFormat::Rf32, Pixel::new(value, 0.0, 0.0, 1.0))
    }

    #[test]
    fn test_add_region_keeps_aggregate_in_lockstep() {
        let mut storage = storage(RegionSize::Size64);
        storage.add_region(WorldPos::new(0.0, 0.0)).unwrap();
        storage.add_region(WorldPos::new(-1.0, 0.0)).unwrap();
        assert_eq!(storage.region_count(), 2);
        for kind in MapKind::ALL {
            assert_eq!(storage.get_maps(kind).len(), 2);
        }
    }

    #[test]
    fn test_failed_add_leaves_no_partial_state() {
        let mut storage = storage(RegionSize::Size64);
        storage.add_region(WorldPos::new(0.0, 0.0)).unwrap();
        let err = storage.add_region(WorldPos::new(32.0, 32.0)).unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));
        assert_eq!(storage.region_count(), 1);
        for kind in MapKind::ALL {
            assert_eq!(storage.get_maps(kind).len(), 1);
        }
    }

    #[test]
    fn test_set_map_region_rejects_bad_index() {
        let mut storage = storage(RegionSize::Size64);
        let err = storage
            .set_map_region(MapKind::Height, 0, uniform_height(64, 1.0))
            .unwrap_err();
        assert!(matches!(err, StorageError::IndexOutOfRange { .. }));
    }

    #[test]
    fn test_set_maps_count_mismatch() {
        let mut storage = storage(RegionSize::Size64);
        storage.add_region(WorldPos::new(0.0, 0.0)).unwrap();
        let err = storage
            .set_maps(MapKind::Height, vec![])
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::CountMismatch {
                expected: 1,
                actual: 0
            }
        ));
    }

    #[test]
    fn test_incremental_widen_never_narrows() {
        let mut storage = storage(RegionSize::Size64);
        storage
            .add_region_with_maps(WorldPos::new(0.0, 0.0), vec![uniform_height(64, 100.0)])
            .unwrap();
        assert_eq!(storage.height_range(), HeightRange::new(0.0, 100.0));

        // Replacing the only tile with a flat 5.0 cannot narrow the range.
        storage
            .set_map_region(MapKind::Height, 0, uniform_height(64, 5.0))
            .unwrap();
        assert_eq!(storage.height_range(), HeightRange::new(0.0, 100.0));

        // The explicit recompute is exact.
        storage.update_height_range();
        assert_eq!(storage.height_range(), HeightRange::new(5.0, 5.0));
    }

    #[test]
    fn test_get_pixel_miss_returns_zero_pixel() {
        let storage = storage(RegionSize::Size64);
        assert_eq!(
            storage.get_pixel(MapKind::Height, WorldPos::new(10.0, 10.0)),
            Pixel::ZERO
        );
        assert_eq!(storage.get_height(WorldPos::new(10.0, 10.0)), 0.0);
    }

    #[test]
    fn test_channel_projections() {
        let mut storage = storage(RegionSize::Size64);
        storage.add_region(WorldPos::new(0.0, 0.0)).unwrap();
        let pos = WorldPos::new(5.0, 5.0);
        // Default color fill is white albedo with 0.5 roughness alpha.
        assert!((storage.get_roughness(pos) - 0.5).abs() < 1.0 / 255.0);
        assert_eq!(storage.get_color(pos).a, 1.0, "albedo reads opaque");
    }

    #[test]
    fn test_region_size_locked_after_first_region() {
        let mut storage = storage(RegionSize::Size64);
        storage.set_region_size(RegionSize::Size128);
        assert_eq!(storage.region_size(), RegionSize::Size128);

        storage.add_region(WorldPos::new(0.0, 0.0)).unwrap();
        storage.set_region_size(RegionSize::Size256);
        assert_eq!(
            storage.region_size(),
            RegionSize::Size128,
            "size change after first region must be ignored"
        );
    }

    #[test]
    fn test_noise_blend_fractions_clamped() {
        let mut storage = storage(RegionSize::Size64);
        storage.set_noise_blend_near(-0.5);
        storage.set_noise_blend_far(3.0);
        assert_eq!(storage.noise().blend_near, 0.0);
        assert_eq!(storage.noise().blend_far, 1.0);
    }

    #[test]
    fn test_set_region_offsets_resizes_layers() {
        let mut storage = storage(RegionSize::Size64);
        storage
            .set_region_offsets(vec![RegionCoord::new(0, 0), RegionCoord::new(1, 0)])
            .unwrap();
        assert_eq!(storage.region_count(), 2);
        for kind in MapKind::ALL {
            assert_eq!(storage.get_maps(kind).len(), 2);
        }
    }

    #[test]
    fn test_generated_reads_rebuild_lazily() {
        let mut storage = storage(RegionSize::Size64);
        storage.add_region(WorldPos::new(0.0, 0.0)).unwrap();
        assert!(storage.is_artifact_dirty(ArtifactKind::RegionMap));

        let first = storage.generated_handle(ArtifactKind::RegionMap);
        assert!(!storage.is_artifact_dirty(ArtifactKind::RegionMap));
        assert_eq!(storage.generated_handle(ArtifactKind::RegionMap), first);

        storage.force_update_maps(None);
        let second = storage.generated_handle(ArtifactKind::RegionMap);
        assert_ne!(first, second, "dirty mark must produce a new resource");
    }

    #[test]
    fn test_region_map_image_cached_after_rebuild() {
        let mut storage = storage(RegionSize::Size64);
        storage.add_region(WorldPos::new(0.0, 0.0)).unwrap();
        storage.generated_handle(ArtifactKind::RegionMap);
        let image = storage
            .generated_image(ArtifactKind::RegionMap)
            .expect("region map keeps its source image");
        assert_eq!(image.get_pixel(8, 8).r, 1.0);
    }
}
