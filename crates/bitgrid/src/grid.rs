//! Grid data model.
//!
//! A [`Grid`] owns a row-major cell vector whose length always equals
//! `width * height`. Fields are private so every construction path goes
//! through that check, including deserialization via [`GridRecord`].

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{GridError, Result, check_dimensions};

/// A monochrome pixel grid. `true` cells are ink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRecord", into = "GridRecord")]
pub struct Grid {
    id: String,
    name: String,
    width: u16,
    height: u16,
    cells: Vec<bool>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Unvalidated grid fields, as stored or transmitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRecord {
    pub id: String,
    pub name: String,
    pub width: u16,
    pub height: u16,
    pub cells: Vec<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<GridRecord> for Grid {
    type Error = GridError;

    fn try_from(rec: GridRecord) -> Result<Self> {
        let (width, height) = check_dimensions(u32::from(rec.width), u32::from(rec.height))?;
        check_cell_count(width, height, &rec.cells)?;
        Ok(Self {
            id: rec.id,
            name: rec.name,
            width,
            height,
            cells: rec.cells,
            created_at: rec.created_at,
            updated_at: rec.updated_at,
        })
    }
}

impl From<Grid> for GridRecord {
    fn from(grid: Grid) -> Self {
        Self {
            id: grid.id,
            name: grid.name,
            width: grid.width,
            height: grid.height,
            cells: grid.cells,
            created_at: grid.created_at,
            updated_at: grid.updated_at,
        }
    }
}

impl Grid {
    /// Create a blank grid with a fresh id.
    pub fn new(name: impl Into<String>, width: u16, height: u16) -> Result<Self> {
        let cells = vec![false; usize::from(width) * usize::from(height)];
        Self::from_cells(name, width, height, cells)
    }

    /// Create a grid with a fresh id from existing row-major cells.
    pub fn from_cells(
        name: impl Into<String>,
        width: u16,
        height: u16,
        cells: Vec<bool>,
    ) -> Result<Self> {
        let (width, height) = check_dimensions(u32::from(width), u32::from(height))?;
        check_cell_count(width, height, &cells)?;
        let now = now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            width,
            height,
            cells,
            created_at: now,
            updated_at: now,
        })
    }

    /// Copy this grid's content under a new id and name.
    ///
    /// The copy keeps `created_at`; `updated_at` moves past the original's.
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        let mut copy = Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            ..self.clone()
        };
        copy.touch();
        copy
    }

    /// Replace the content while keeping id, name and creation time.
    pub fn with_cells(&self, width: u16, height: u16, cells: Vec<bool>) -> Result<Self> {
        let (width, height) = check_dimensions(u32::from(width), u32::from(height))?;
        check_cell_count(width, height, &cells)?;
        Ok(self.rebuilt(width, height, cells))
    }

    /// Build a sibling grid with pre-validated content and a refreshed `updated_at`.
    pub(crate) fn rebuilt(&self, width: u16, height: u16, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), usize::from(width) * usize::from(height));
        let mut next = Self {
            id: self.id.clone(),
            name: self.name.clone(),
            width,
            height,
            cells,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        next.touch();
        next
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Row-major cells (`index = y * width + x`).
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell value at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: u16, y: u16) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)])
    }

    /// Number of ink cells.
    pub fn ink_count(&self) -> usize {
        self.cells.iter().filter(|&&on| on).count()
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Refresh `updated_at`. The new value is always strictly later than the old one.
    pub fn touch(&mut self) {
        let now = now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + TimeDelta::microseconds(1)
        };
    }
}

fn check_cell_count(width: u16, height: u16, cells: &[bool]) -> Result<()> {
    let expected = usize::from(width) * usize::from(height);
    if cells.len() != expected {
        return Err(GridError::CellCountMismatch {
            expected,
            actual: cells.len(),
        });
    }
    Ok(())
}

/// Current time truncated to microseconds, the precision timestamps are stored at.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
