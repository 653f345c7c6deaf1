//! Geometric and content edits on grids.
//!
//! Every edit returns a new [`Grid`] with the same identity and a refreshed
//! `updated_at`; the input grid is never modified.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Grid, GridError, Result, check_dimensions};

/// Direction content moves in when shifting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(s)
    }
}

/// Copy the overlapping top-left region of `cells` into a blank grid of the new size.
pub fn resize_cells(
    cells: &[bool],
    old_width: u16,
    old_height: u16,
    new_width: u16,
    new_height: u16,
) -> Vec<bool> {
    let (ow, oh) = (usize::from(old_width), usize::from(old_height));
    let (nw, nh) = (usize::from(new_width), usize::from(new_height));
    let mut out = vec![false; nw * nh];
    for y in 0..oh.min(nh) {
        for x in 0..ow.min(nw) {
            out[y * nw + x] = cells[y * ow + x];
        }
    }
    out
}

/// Move every cell one step toward `dir`. Vacated cells become `false`;
/// nothing wraps across rows or edges.
pub fn shift_cells(cells: &[bool], width: u16, height: u16, dir: Direction) -> Vec<bool> {
    let (w, h) = (usize::from(width), usize::from(height));
    let mut out = vec![false; w * h];
    for y in 0..h {
        for x in 0..w {
            let source = match dir {
                Direction::Up => (y + 1 < h).then(|| (x, y + 1)),
                Direction::Down => y.checked_sub(1).map(|sy| (x, sy)),
                Direction::Left => (x + 1 < w).then(|| (x + 1, y)),
                Direction::Right => x.checked_sub(1).map(|sx| (sx, y)),
            };
            if let Some((sx, sy)) = source {
                out[y * w + x] = cells[sy * w + sx];
            }
        }
    }
    out
}

impl Grid {
    /// Resize, keeping content in the overlap of the old and new bounds.
    pub fn resized(&self, width: u16, height: u16) -> Result<Grid> {
        let (width, height) = check_dimensions(u32::from(width), u32::from(height))?;
        debug!(
            old_width = self.width(),
            old_height = self.height(),
            width,
            height,
            "Resizing grid"
        );
        let cells = resize_cells(self.cells(), self.width(), self.height(), width, height);
        Ok(self.rebuilt(width, height, cells))
    }

    pub fn shifted(&self, dir: Direction) -> Grid {
        let cells = shift_cells(self.cells(), self.width(), self.height(), dir);
        self.rebuilt(self.width(), self.height(), cells)
    }

    pub fn inverted(&self) -> Grid {
        let cells = self.cells().iter().map(|&on| !on).collect();
        self.rebuilt(self.width(), self.height(), cells)
    }

    /// Flip exactly one cell. Indices outside the grid are rejected.
    pub fn toggled(&self, index: usize) -> Result<Grid> {
        if index >= self.len() {
            return Err(GridError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        let mut cells = self.cells().to_vec();
        cells[index] = !cells[index];
        Ok(self.rebuilt(self.width(), self.height(), cells))
    }

    /// Reset every cell to `false`.
    pub fn cleared(&self) -> Grid {
        let cells = vec![false; self.len()];
        self.rebuilt(self.width(), self.height(), cells)
    }
}
