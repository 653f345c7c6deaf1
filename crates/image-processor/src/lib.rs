//! Image processing for monochrome display bitmaps.
//!
//! Provides dithering (Floyd-Steinberg and threshold), downscaling to the
//! 128-pixel grid ceiling, and sampling quantized images into grids.

pub mod dither;
pub mod resize;
pub mod sample;

use image::{DynamicImage, ImageError, RgbaImage};
use tracing::debug;

// Re-exports for convenience
pub use dither::{DitherMode, dither, floyd_steinberg_dither, gray_level, threshold_convert};
pub use resize::{fit_dimensions, fit_within};
pub use sample::{to_cells, to_grid};

/// Largest side an imported image is scaled to (matches the grid ceiling).
pub const MAX_IMAGE_DIMENSION: u32 = bitgrid::MAX_DIMENSION as u32;

/// Decode image bytes (any format the `image` crate recognizes).
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    let img = image::load_from_memory(bytes)?;
    debug!(width = img.width(), height = img.height(), "Decoded image");
    Ok(img)
}

/// Decode and downscale an image into the RGBA buffer dithering starts from.
pub fn prepare_source(bytes: &[u8], max: u32) -> Result<RgbaImage, ImageError> {
    let img = decode_image(bytes)?;
    Ok(fit_within(&img, max).to_rgba8())
}
