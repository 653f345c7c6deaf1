//! Packed-byte codec for display firmware.
//!
//! Each row is packed independently into `ceil(width / 8)` bytes and rows are
//! concatenated top to bottom. Within a row the leftmost pixel is bit 0 of the
//! first byte (LSB first), pixel 8 is bit 0 of the second byte, and so on.
//! Unused high bits of the last byte are zero.
//!
//! This is the same layout as "reverse the row, left-pad to a multiple of 8,
//! read MSB-first chunks, then reverse the chunk order", which is how the
//! target hardware addresses columns from the rightmost pixel.

use tracing::debug;

use crate::Grid;

/// Number of bytes one packed row occupies.
pub fn bytes_per_row(width: u16) -> usize {
    usize::from(width).div_ceil(8)
}

/// Pack a grid into bytes, row by row.
pub fn encode(grid: &Grid) -> Vec<u8> {
    encode_cells(grid.cells(), grid.width())
}

/// Pack row-major cells of the given width into bytes.
pub fn encode_cells(cells: &[bool], width: u16) -> Vec<u8> {
    let width = usize::from(width).max(1);
    cells.chunks(width).flat_map(encode_row).collect()
}

/// Pack one row: 8 pixels per byte, LSB first.
fn encode_row(row: &[bool]) -> Vec<u8> {
    row.chunks(8)
        .map(|chunk| {
            let mut byte_val: u8 = 0;
            for (bit, &on) in chunk.iter().enumerate() {
                if on {
                    byte_val |= 1 << bit;
                }
            }
            byte_val
        })
        .collect()
}

/// Unpack bytes into `width * height` row-major cells.
///
/// Bytes per row are inferred as `ceil(bytes.len() / height)`. Input that does
/// not divide evenly is tolerated: short rows and missing rows read as `false`,
/// and bits past `width` in a row are dropped.
pub fn decode(bytes: &[u8], width: u16, height: u16) -> Vec<bool> {
    let (w, h) = (usize::from(width), usize::from(height));
    let mut cells = vec![false; w * h];
    if bytes.is_empty() || h == 0 {
        return cells;
    }

    let per_row = bytes.len().div_ceil(h);
    if per_row * h != bytes.len() || per_row != bytes_per_row(width) {
        debug!(
            len = bytes.len(),
            width, height, per_row, "Decoding bytes that do not match grid dimensions"
        );
    }

    for (y, row) in bytes.chunks(per_row).take(h).enumerate() {
        let row_cells = &mut cells[y * w..(y + 1) * w];
        for (x, cell) in row_cells.iter_mut().enumerate().take(row.len() * 8) {
            *cell = (row[x / 8] >> (x % 8)) & 1 == 1;
        }
    }
    cells
}
