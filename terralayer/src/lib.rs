//! Terralayer - sparse tiled terrain raster storage.
//!
//! This library manages the authoritative raster data for a large, tiled
//! terrain surface and keeps derived GPU-consumable resources synchronized
//! with it. A terrain is divided into fixed-size square regions laid out on a
//! sparse 2-D grid; each region carries three co-located raster layers:
//! elevation, paint/control, and color-and-roughness.
//!
//! # High-Level API
//!
//! The [`storage::TerrainStorage`] facade is the single unit of mutation:
//!
//! ```
//! use terralayer::config::StorageConfig;
//! use terralayer::coord::WorldPos;
//! use terralayer::render::NullRenderBackend;
//! use terralayer::storage::TerrainStorage;
//!
//! let mut storage = TerrainStorage::new(
//!     StorageConfig::default(),
//!     Box::new(NullRenderBackend::default()),
//! );
//!
//! storage.add_region(WorldPos::new(0.0, 0.0)).unwrap();
//! assert!(storage.has_region(WorldPos::new(100.0, 100.0)));
//! assert_eq!(storage.get_height(WorldPos::new(100.0, 100.0)), 0.0);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     TerrainStorage                       │
//! │  (region ops, map ops, height ops, queries, config)      │
//! └──────────────────────────────────────────────────────────┘
//!        │               │                │
//!        ▼               ▼                ▼
//! ┌──────────────┐ ┌───────────┐ ┌─────────────────────────┐
//! │RegionRegistry│ │ TileStore │ │     GeneratedCache      │
//! │ coord ↔ index│ │ 3 layers  │ │ dirty-tracked artifacts │
//! └──────────────┘ └───────────┘ └─────────────────────────┘
//!                                          │
//!                                          ▼
//!                               ┌─────────────────────────┐
//!                               │ RenderBackend (trait)   │
//!                               │ texture/array allocation│
//!                               └─────────────────────────┘
//! ```
//!
//! The rendering backend is an abstract seam: the library assembles pixel
//! buffers and hands them over, it never talks to a GPU API directly.

pub mod config;
pub mod coord;
pub mod generated;
pub mod height_range;
pub mod io;
pub mod logging;
pub mod raster;
pub mod render;
pub mod storage;

/// Version of the terralayer library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
