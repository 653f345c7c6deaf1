//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("GRID_WIDTH", "128", "Width of new grids in cells (1-128)"),
    ("GRID_HEIGHT", "64", "Height of new grids in cells (1-128)"),
    (
        "DITHER_MODE",
        "floyd-steinberg",
        "Image quantization: floyd-steinberg or threshold",
    ),
    ("DITHER_THRESHOLD", "128", "Gray level at or above which a pixel is white (0-200)"),
    (
        "IMAGE_MAX_DIMENSION",
        "128",
        "Imported images are downscaled so neither side exceeds this (1-128)",
    ),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::validate_setting;

    #[test]
    fn test_defaults_pass_validation() {
        for def in DEFAULT_SETTINGS.values() {
            assert!(
                validate_setting(def.key, def.default).is_ok(),
                "default for {} is invalid",
                def.key
            );
        }
    }

    #[test]
    fn test_get_default() {
        assert_eq!(get_default("GRID_WIDTH"), Some("128"));
        assert_eq!(get_default("GRID_HEIGHT"), Some("64"));
        assert_eq!(get_default("NOPE"), None);
    }
}
