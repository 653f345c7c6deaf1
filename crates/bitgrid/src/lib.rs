//! Monochrome pixel grids for small LCD/OLED displays.
//!
//! Provides the grid data model, the packed-byte codec used by display
//! firmware, geometric edits, and the `0xNN` hex text format.

pub mod codec;
pub mod grid;
pub mod text;
pub mod transform;

// Re-exports for convenience
pub use codec::{bytes_per_row, decode, encode};
pub use grid::{Grid, GridRecord};
pub use text::{export, format_hex, parse_hex};
pub use transform::Direction;

/// Largest width or height a grid may have (display resolution ceiling).
pub const MAX_DIMENSION: u16 = 128;

/// Width of a freshly created grid.
pub const DEFAULT_WIDTH: u16 = 128;

/// Height of a freshly created grid.
pub const DEFAULT_HEIGHT: u16 = 64;

/// Errors that can occur while building or editing grids.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Invalid grid dimensions {width}x{height}: each side must be between 1 and 128")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Cell count mismatch: expected {expected}, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },

    #[error("Cell index {index} out of range for {len} cells")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid hex token: {0:?}")]
    InvalidHexToken(String),

    #[error("Import text contains no hex bytes")]
    EmptyImport,
}

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Check that both sides fall within `1..=MAX_DIMENSION`.
pub fn check_dimensions(width: u32, height: u32) -> Result<(u16, u16)> {
    let valid = 1..=u32::from(MAX_DIMENSION);
    if !valid.contains(&width) || !valid.contains(&height) {
        return Err(GridError::InvalidDimensions { width, height });
    }
    Ok((width as u16, height as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dimensions_bounds() {
        assert_eq!(check_dimensions(1, 1), Ok((1, 1)));
        assert_eq!(check_dimensions(128, 128), Ok((128, 128)));
        assert!(check_dimensions(0, 10).is_err());
        assert!(check_dimensions(10, 0).is_err());
        assert!(check_dimensions(129, 64).is_err());
        assert!(check_dimensions(64, 129).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = GridError::IndexOutOfRange { index: 9, len: 8 };
        assert_eq!(err.to_string(), "Cell index 9 out of range for 8 cells");
        let err = GridError::InvalidHexToken("zz".into());
        assert_eq!(err.to_string(), "Invalid hex token: \"zz\"");
    }
}
