//! Error taxonomy for storage operations.
//!
//! Structural errors abort the single operation with no partial mutation
//! across the registry/tile-store/cache aggregate. Malformed raster input is
//! deliberately absent from this taxonomy: it is normalized to defaults and
//! logged by the sanitizer instead.

use thiserror::Error;

use crate::coord::RegionCoord;

/// Errors raised by terrain storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No region registered at the coordinate.
    #[error("no region at {coord}")]
    NotFound { coord: RegionCoord },

    /// A region is already registered at the coordinate.
    #[error("region already exists at {coord}")]
    AlreadyExists { coord: RegionCoord },

    /// The coordinate falls outside the fixed region grid.
    #[error("region coordinate {coord} outside the region grid")]
    GridBoundsExceeded { coord: RegionCoord },

    /// A dense index beyond the current region count.
    #[error("region index {index} out of range (region count {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A bulk operation supplied the wrong number of elements.
    #[error("expected {expected} maps, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    /// A bulk registry rebuild contained the same coordinate twice.
    #[error("duplicate region coordinate {coord}")]
    DuplicateCoordinate { coord: RegionCoord },

    /// I/O failure while persisting or loading terrain data.
    #[error("terrain I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image codec failure during import or export.
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// Persisted data that cannot be decoded.
    #[error("invalid terrain data: {0}")]
    InvalidFormat(String),
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
