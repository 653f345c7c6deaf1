//! Runtime editor configuration loaded from DB + environment overrides.

use image_processor::DitherMode;

use super::manager::SettingsManager;
use crate::pipeline::{DitherParams, MAX_THRESHOLD};

/// Runtime configuration populated from the settings DB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub grid_width: u16,
    pub grid_height: u16,
    pub dither_mode: DitherMode,
    pub dither_threshold: u8,
    pub image_max_dimension: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_width: bitgrid::DEFAULT_WIDTH,
            grid_height: bitgrid::DEFAULT_HEIGHT,
            dither_mode: DitherMode::FloydSteinberg,
            dither_threshold: image_processor::dither::DEFAULT_THRESHOLD,
            image_max_dimension: image_processor::MAX_IMAGE_DIMENSION,
        }
    }
}

impl EditorConfig {
    /// Load configuration from the settings manager (DB-first, env overrides).
    ///
    /// Unparsable or out-of-range values fall back to the defaults.
    pub fn load(sm: &SettingsManager) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> String { sm.get_setting(key).unwrap_or_default() };
        let defaults = Self::default();

        let mut dither_mode = parse_mode(&g("DITHER_MODE"), defaults.dither_mode);
        let mut dither_threshold =
            parse_threshold(&g("DITHER_THRESHOLD"), defaults.dither_threshold);

        // Environment variable overrides
        if let Ok(v) = std::env::var("DITHER_MODE") {
            dither_mode = parse_mode(&v, dither_mode);
        }
        if let Ok(v) = std::env::var("DITHER_THRESHOLD") {
            dither_threshold = parse_threshold(&v, dither_threshold);
        }

        Ok(Self {
            grid_width: parse_dimension(&g("GRID_WIDTH"), defaults.grid_width),
            grid_height: parse_dimension(&g("GRID_HEIGHT"), defaults.grid_height),
            dither_mode,
            dither_threshold,
            image_max_dimension: u32::from(parse_dimension(
                &g("IMAGE_MAX_DIMENSION"),
                bitgrid::MAX_DIMENSION,
            )),
        })
    }

    pub fn dither_params(&self) -> DitherParams {
        DitherParams {
            mode: self.dither_mode,
            threshold: self.dither_threshold,
        }
    }
}

fn parse_mode(s: &str, default: DitherMode) -> DitherMode {
    s.parse().unwrap_or(default)
}

fn parse_threshold(s: &str, default: u8) -> u8 {
    match s.parse::<u8>() {
        Ok(v) if v <= MAX_THRESHOLD => v,
        _ => default,
    }
}

fn parse_dimension(s: &str, default: u16) -> u16 {
    match s.parse::<u16>() {
        Ok(v) if (1..=bitgrid::MAX_DIMENSION).contains(&v) => v,
        _ => default,
    }
}
