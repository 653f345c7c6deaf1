//! Editor error type.

use bitgrid::GridError;
use grid_db::DbError;

/// Failures surfaced by [`crate::Editor`] operations.
///
/// A failed operation leaves the working grid untouched.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Invalid import format: {0}")]
    InvalidImportFormat(#[source] GridError),

    #[error(
        "Grid size {width}x{height} out of range (each side must be 1-{max})",
        max = bitgrid::MAX_DIMENSION
    )]
    DimensionOutOfRange { width: u32, height: u32 },

    #[error(
        "Dither threshold {0} out of range (must be 0-{max})",
        max = crate::pipeline::MAX_THRESHOLD
    )]
    ThresholdOutOfRange(u8),

    #[error("Image decode failed: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("No image loaded")]
    NoImageLoaded,

    #[error("Grid not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

pub type Result<T> = std::result::Result<T, EditorError>;
