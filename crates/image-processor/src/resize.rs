//! Downscaling images to fit the display grid.
//!
//! Aspect ratio is preserved and bilinear (triangle) filtering is used.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

/// Target size that fits `width x height` inside `max x max`.
///
/// The longer side maps to `max`; the other side is rounded and never
/// drops below 1. Images that already fit are left at their size.
/// A `max` of 0 is treated as 1.
pub fn fit_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    let max = max.max(1);
    if width <= max && height <= max {
        return (width, height);
    }
    let longer = width.max(height);
    let ratio = f64::from(max) / f64::from(longer);
    let scale = |side: u32| ((f64::from(side) * ratio).round() as u32).clamp(1, max);
    (scale(width), scale(height))
}

/// Downscale an image so neither side exceeds `max`.
///
/// Returns the original image unchanged if it already fits.
pub fn fit_within(img: &DynamicImage, max: u32) -> DynamicImage {
    let (orig_w, orig_h) = (img.width(), img.height());
    let (new_width, new_height) = fit_dimensions(orig_w, orig_h, max);

    if (new_width, new_height) == (orig_w, orig_h) {
        debug!(orig_w, orig_h, max, "Image already fits, skipping resize");
        return img.clone();
    }

    debug!(
        orig_w,
        orig_h, new_width, new_height, "Downscaling image to fit grid"
    );

    img.resize_exact(new_width, new_height, FilterType::Triangle)
}
