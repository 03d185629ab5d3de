//! Artifact table types for the generated resource cache.

use std::fmt;

use crate::raster::{MapKind, RasterTile};
use crate::render::{RenderBackend, ResourceHandle};

/// The renderable artifacts derived from the tile store and registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// One pixel per grid cell encoding which dense index occupies it.
    RegionMap,
    /// Smoothed 512x512 variant of the region map for edge blending.
    RegionBlendMap,
    /// Packed array of all height tiles in dense index order.
    HeightArray,
    /// Packed array of all control tiles.
    ControlArray,
    /// Packed array of all color tiles.
    ColorArray,
    /// Color tiles with opaque alpha, for albedo sampling.
    AlbedoArray,
    /// Normal maps derived from the height tiles.
    NormalArray,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 7] = [
        ArtifactKind::RegionMap,
        ArtifactKind::RegionBlendMap,
        ArtifactKind::HeightArray,
        ArtifactKind::ControlArray,
        ArtifactKind::ColorArray,
        ArtifactKind::AlbedoArray,
        ArtifactKind::NormalArray,
    ];

    pub(crate) fn slot(self) -> usize {
        match self {
            ArtifactKind::RegionMap => 0,
            ArtifactKind::RegionBlendMap => 1,
            ArtifactKind::HeightArray => 2,
            ArtifactKind::ControlArray => 3,
            ArtifactKind::ColorArray => 4,
            ArtifactKind::AlbedoArray => 5,
            ArtifactKind::NormalArray => 6,
        }
    }

    /// The artifacts whose source data is one raster layer.
    pub fn for_layer(kind: MapKind) -> &'static [ArtifactKind] {
        match kind {
            MapKind::Height => &[ArtifactKind::HeightArray, ArtifactKind::NormalArray],
            MapKind::Control => &[ArtifactKind::ControlArray],
            MapKind::Color => &[ArtifactKind::ColorArray, ArtifactKind::AlbedoArray],
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::RegionMap => "region map",
            ArtifactKind::RegionBlendMap => "region blend map",
            ArtifactKind::HeightArray => "height array",
            ArtifactKind::ControlArray => "control array",
            ArtifactKind::ColorArray => "color array",
            ArtifactKind::AlbedoArray => "albedo array",
            ArtifactKind::NormalArray => "normal array",
        };
        f.write_str(name)
    }
}

/// One cached artifact: the backend handle, the last-built source image
/// where one exists, and the dirty flag.
///
/// Entries start dirty so the first read always builds.
#[derive(Debug)]
pub struct GeneratedEntry {
    handle: Option<ResourceHandle>,
    image: Option<RasterTile>,
    dirty: bool,
}

impl Default for GeneratedEntry {
    fn default() -> Self {
        Self {
            handle: None,
            image: None,
            dirty: true,
        }
    }
}

impl GeneratedEntry {
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn handle(&self) -> Option<ResourceHandle> {
        self.handle
    }

    pub fn image(&self) -> Option<&RasterTile> {
        self.image.as_ref()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Swap in a freshly built resource, releasing the stale handle.
    pub(crate) fn install(
        &mut self,
        backend: &mut dyn RenderBackend,
        handle: ResourceHandle,
        image: Option<RasterTile>,
    ) {
        if let Some(old) = self.handle.take() {
            backend.free(old);
        }
        self.handle = Some(handle);
        self.image = image;
        self.dirty = false;
    }

    /// Release the resource and return to the initial dirty state.
    pub(crate) fn clear(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(old) = self.handle.take() {
            backend.free(old);
        }
        self.image = None;
        self.dirty = true;
    }
}
