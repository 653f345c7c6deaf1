//! Dithering algorithms for converting color images to black-and-white.
//!
//! Provides Floyd-Steinberg error-diffusion dithering and simple threshold
//! conversion. Both take the RGBA buffer by value, quantize every pixel to
//! black (0) or white (255) in all three color channels, force alpha to 255
//! and hand the buffer back.
//!
//! `threshold` is valid over the whole `u8` range; narrower bounds are the
//! caller's concern.

use std::fmt;
use std::str::FromStr;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Luma weights for R, G, B.
pub const LUMA_WEIGHTS: [f64; 3] = [0.3, 0.59, 0.11];

/// Default threshold value for binarization.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Quantization algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DitherMode {
    #[default]
    FloydSteinberg,
    Threshold,
}

impl FromStr for DitherMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "floyd-steinberg" => Ok(Self::FloydSteinberg),
            "threshold" => Ok(Self::Threshold),
            other => Err(format!("unknown dither mode: {other}")),
        }
    }
}

impl fmt::Display for DitherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FloydSteinberg => f.write_str("floyd-steinberg"),
            Self::Threshold => f.write_str("threshold"),
        }
    }
}

/// Weighted luma of a pixel before rounding.
///
/// Evaluated in `f64` so exact halves such as (0, 5, 5) = 3.5 round up.
fn luma(px: &Rgba<u8>) -> f64 {
    let [r, g, b, _] = px.0;
    LUMA_WEIGHTS[0] * f64::from(r) + LUMA_WEIGHTS[1] * f64::from(g) + LUMA_WEIGHTS[2] * f64::from(b)
}

/// Rounded gray level of a pixel.
pub fn gray_level(px: &Rgba<u8>) -> u8 {
    luma(px).round().clamp(0.0, 255.0) as u8
}

fn set_level(px: &mut Rgba<u8>, level: u8) {
    px.0 = [level, level, level, 255];
}

/// Quantize with the given algorithm.
pub fn dither(img: RgbaImage, mode: DitherMode, threshold: u8) -> RgbaImage {
    match mode {
        DitherMode::FloydSteinberg => floyd_steinberg_dither(img, threshold),
        DitherMode::Threshold => threshold_convert(img, threshold),
    }
}

/// Apply Floyd-Steinberg dithering.
///
/// Pixels are visited in raster order. Each one is quantized with
/// `gray < threshold ? 0 : 255` and its error is pushed to unvisited
/// neighbors; neighbors outside the image are skipped.
/// Error distribution pattern:
/// - Right:        7/16
/// - Bottom-left:  3/16
/// - Bottom:       5/16
/// - Bottom-right: 1/16
pub fn floyd_steinberg_dither(mut img: RgbaImage, threshold: u8) -> RgbaImage {
    let (width, height) = img.dimensions();
    debug!(width, height, threshold, "Applying Floyd-Steinberg dithering");

    // Luma plus accumulated error; not clamped so diffused error is never lost
    let mut buffer: Vec<Vec<f64>> = (0..height)
        .map(|y| (0..width).map(|x| luma(img.get_pixel(x, y))).collect())
        .collect();

    let threshold = f64::from(threshold);
    for y in 0..height {
        for x in 0..width {
            let gray = buffer[y as usize][x as usize].round();
            let quantized: f64 = if gray < threshold { 0.0 } else { 255.0 };
            let error = gray - quantized;
            buffer[y as usize][x as usize] = quantized;
            set_level(img.get_pixel_mut(x, y), quantized as u8);

            distribute_error(&mut buffer, x, y, width, height, error);
        }
    }

    debug!("Floyd-Steinberg dithering complete");
    img
}

/// Distribute quantization error to neighboring pixels.
fn distribute_error(buffer: &mut [Vec<f64>], x: u32, y: u32, width: u32, height: u32, error: f64) {
    let xu = x as usize;
    let yu = y as usize;

    // Right: 7/16
    if x + 1 < width {
        buffer[yu][xu + 1] += error * 7.0 / 16.0;
    }
    // Bottom-left: 3/16
    if x > 0 && y + 1 < height {
        buffer[yu + 1][xu - 1] += error * 3.0 / 16.0;
    }
    // Bottom: 5/16
    if y + 1 < height {
        buffer[yu + 1][xu] += error * 5.0 / 16.0;
    }
    // Bottom-right: 1/16
    if x + 1 < width && y + 1 < height {
        buffer[yu + 1][xu + 1] += error / 16.0;
    }
}

/// Simple threshold conversion without dithering.
///
/// Pixels whose gray level is >= `threshold` become white (255), others black (0).
pub fn threshold_convert(mut img: RgbaImage, threshold: u8) -> RgbaImage {
    let (width, height) = img.dimensions();
    debug!(width, height, threshold, "Applying threshold conversion");

    for px in img.pixels_mut() {
        let level = if gray_level(px) >= threshold { 255 } else { 0 };
        set_level(px, level);
    }

    img
}
