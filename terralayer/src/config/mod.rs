//! Configuration types for the terrain storage.
//!
//! Configuration is explicit value state passed at construction, not global
//! singleton state. Each struct covers one concern: the region size and
//! scalar settings in [`StorageConfig`], noise blending parameters in
//! [`NoiseParams`].

mod noise;
mod settings;

pub use noise::NoiseParams;
pub use settings::{RegionSize, StorageConfig, FORMAT_VERSION};
