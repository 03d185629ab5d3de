//! Rendering backend seam.
//!
//! The storage never talks to a GPU API directly. On rebuild it assembles
//! pixel buffers and hands them to a [`RenderBackend`], which allocates an
//! opaque resource and returns a handle. Backends may queue the actual GPU
//! upload asynchronously; this library only guarantees that the source data
//! is fully assembled at call time.

use std::cell::Cell;
use std::rc::Rc;

use crate::raster::RasterTile;

/// Opaque identifier for a backend-owned resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle(pub u64);

/// Trait for GPU resource allocation strategies.
///
/// # Implementors
///
/// - [`NullRenderBackend`] - allocates handles without uploading (headless)
/// - [`RecordingBackend`] - counts calls, for tests
pub trait RenderBackend {
    /// Allocate a single 2-D texture from one pixel buffer.
    fn create_texture(&mut self, label: &str, image: &RasterTile) -> ResourceHandle;

    /// Allocate a layered array texture from an ordered sequence of
    /// same-size, same-format pixel buffers.
    fn create_texture_array(&mut self, label: &str, layers: &[RasterTile]) -> ResourceHandle;

    /// Release a previously allocated resource.
    fn free(&mut self, handle: ResourceHandle);
}

/// Backend that allocates handles but performs no uploads.
///
/// Useful headless: editors and tools that manipulate terrain data without a
/// renderer attached.
#[derive(Debug, Default)]
pub struct NullRenderBackend {
    next: u64,
}

impl RenderBackend for NullRenderBackend {
    fn create_texture(&mut self, _label: &str, _image: &RasterTile) -> ResourceHandle {
        self.next += 1;
        ResourceHandle(self.next)
    }

    fn create_texture_array(&mut self, _label: &str, _layers: &[RasterTile]) -> ResourceHandle {
        self.next += 1;
        ResourceHandle(self.next)
    }

    fn free(&mut self, _handle: ResourceHandle) {}
}

/// Backend that records allocation and release counts.
///
/// The counters are shared, so a clone kept by the caller still observes
/// calls after the backend has been moved into the storage. Single-threaded
/// by design, like the storage itself.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    created: Rc<Cell<usize>>,
    freed: Rc<Cell<usize>>,
    next: Rc<Cell<u64>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total allocations issued so far.
    pub fn created(&self) -> usize {
        self.created.get()
    }

    /// Total releases issued so far.
    pub fn freed(&self) -> usize {
        self.freed.get()
    }

    fn allocate(&mut self) -> ResourceHandle {
        self.created.set(self.created.get() + 1);
        self.next.set(self.next.get() + 1);
        ResourceHandle(self.next.get())
    }
}

impl RenderBackend for RecordingBackend {
    fn create_texture(&mut self, _label: &str, _image: &RasterTile) -> ResourceHandle {
        self.allocate()
    }

    fn create_texture_array(&mut self, _label: &str, _layers: &[RasterTile]) -> ResourceHandle {
        self.allocate()
    }

    fn free(&mut self, _handle: ResourceHandle) {
        self.freed.set(self.freed.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{Pixel, PixelFormat, RasterTile};

    #[test]
    fn test_null_backend_hands_out_distinct_handles() {
        let mut backend = NullRenderBackend::default();
        let tile = RasterTile::filled(4, PixelFormat::Rf32, Pixel::BLACK);
        let a = backend.create_texture("a", &tile);
        let b = backend.create_texture_array("b", &[tile]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_recording_backend_counts_survive_move() {
        let backend = RecordingBackend::new();
        let observer = backend.clone();
        let mut boxed: Box<dyn RenderBackend> = Box::new(backend);
        let tile = RasterTile::filled(4, PixelFormat::Rf32, Pixel::BLACK);
        let handle = boxed.create_texture("t", &tile);
        boxed.free(handle);
        assert_eq!(observer.created(), 1);
        assert_eq!(observer.freed(), 1);
    }
}
