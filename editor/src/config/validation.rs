//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_DITHER_MODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(floyd-steinberg|threshold)$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "GRID_WIDTH" | "GRID_HEIGHT" | "IMAGE_MAX_DIMENSION" => {
            validate_int_range(value, 1, i64::from(bitgrid::MAX_DIMENSION))?
        }
        "DITHER_THRESHOLD" => {
            validate_int_range(value, 0, i64::from(crate::pipeline::MAX_THRESHOLD))?
        }
        "DITHER_MODE" => {
            if !RE_DITHER_MODE.is_match(value) {
                return Err("must be 'floyd-steinberg' or 'threshold'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if !(min..=max).contains(&v) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
