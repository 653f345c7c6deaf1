//! `0xNN` hex text format for pasting into firmware source.
//!
//! Export writes one line per grid row, bytes separated by `,` and lines
//! separated by `,\n`, so the whole text is a single comma-separated list.
//! Import accepts tokens with or without a `0x` prefix in any case and ignores
//! all whitespace.

use std::sync::LazyLock;

use regex::Regex;

use crate::codec::{bytes_per_row, encode};
use crate::{Grid, GridError, Result};

static RE_HEX_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:0[xX])?([0-9A-Fa-f]{1,2})$").unwrap());

/// Format bytes as `0xNN` literals, `per_row` bytes per line.
pub fn format_hex(bytes: &[u8], per_row: usize) -> String {
    bytes
        .chunks(per_row.max(1))
        .map(|row| {
            row.iter()
                .map(|b| format!("0x{b:02x}"))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Encode a grid and format it for export.
pub fn export(grid: &Grid) -> String {
    format_hex(&encode(grid), bytes_per_row(grid.width()))
}

/// Parse comma-separated hex byte tokens.
///
/// Empty tokens (such as a trailing comma) are skipped. Any other token that
/// is not one or two hex digits is an error, as is input with no tokens.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let mut bytes = Vec::new();
    for token in cleaned.split(',').filter(|t| !t.is_empty()) {
        let digits = RE_HEX_TOKEN
            .captures(token)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| GridError::InvalidHexToken(token.to_string()))?;
        let value = u8::from_str_radix(digits.as_str(), 16)
            .map_err(|_| GridError::InvalidHexToken(token.to_string()))?;
        bytes.push(value);
    }
    if bytes.is_empty() {
        return Err(GridError::EmptyImport);
    }
    Ok(bytes)
}
