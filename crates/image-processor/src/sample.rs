//! Sampling quantized images into grids.
//!
//! One pixel becomes one cell: a pixel is ink iff its red channel is 0,
//! which after dithering means it was quantized to black.

use bitgrid::{Grid, GridError};
use image::RgbaImage;
use tracing::debug;

/// Row-major ink cells of a quantized image.
pub fn to_cells(img: &RgbaImage) -> Vec<bool> {
    img.pixels().map(|px| px.0[0] == 0).collect()
}

/// Build a new grid with the image's dimensions.
///
/// Fails if either side is outside the grid bounds; downscale first.
pub fn to_grid(img: &RgbaImage, name: impl Into<String>) -> Result<Grid, GridError> {
    let (width, height) = bitgrid::check_dimensions(img.width(), img.height())?;
    let cells = to_cells(img);
    debug!(width, height, ink = cells.iter().filter(|&&on| on).count(), "Sampled image into grid");
    Grid::from_cells(name, width, height, cells)
}
