//! Saved grid history and the working grid slot.
//!
//! Saved grids are unique by id. Saving a grid whose id already exists only
//! replaces the stored row when the incoming `updated_at` is strictly newer.
//! Cell content is stored as the packed display bytes.

use bitgrid::{Grid, GridRecord};
use chrono::{DateTime, Utc};

use crate::{Database, DbError, OptionalExt};

/// Settings key the working grid is stored under.
pub const CURRENT_GRID_KEY: &str = "current_grid";

const GRID_COLUMNS: &str = "id, name, width, height, bitmap, created_at, updated_at";

/// A `grids` row before validation.
struct GridRow {
    id: String,
    name: String,
    width: i64,
    height: i64,
    bitmap: Vec<u8>,
    created_at: i64,
    updated_at: i64,
}

impl GridRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            width: row.get(2)?,
            height: row.get(3)?,
            bitmap: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn into_grid(self) -> Result<Grid, DbError> {
        let invalid = |what: &str| DbError::InvalidData(format!("grid {}: {what}", self.id));
        let width = u16::try_from(self.width).map_err(|_| invalid("bad width"))?;
        let height = u16::try_from(self.height).map_err(|_| invalid("bad height"))?;
        let created_at = from_micros(self.created_at).ok_or_else(|| invalid("bad created_at"))?;
        let updated_at = from_micros(self.updated_at).ok_or_else(|| invalid("bad updated_at"))?;
        let cells = bitgrid::decode(&self.bitmap, width, height);
        let id = self.id;
        Grid::try_from(GridRecord {
            id: id.clone(),
            name: self.name,
            width,
            height,
            cells,
            created_at,
            updated_at,
        })
        .map_err(|e| DbError::InvalidData(format!("grid {id}: {e}")))
    }
}

fn from_micros(micros: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
}

impl Database {
    /// Insert a grid, or replace the stored one if `grid` is strictly newer.
    ///
    /// Returns `true` if a row was written.
    pub fn upsert_grid(&self, grid: &Grid) -> Result<bool, DbError> {
        let bitmap = bitgrid::encode(grid);
        self.with_conn(|conn| {
            let changed = conn.execute(
                "INSERT INTO grids (id, name, width, height, bitmap, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     width = excluded.width,
                     height = excluded.height,
                     bitmap = excluded.bitmap,
                     updated_at = excluded.updated_at
                 WHERE excluded.updated_at > grids.updated_at",
                rusqlite::params![
                    grid.id(),
                    grid.name(),
                    grid.width(),
                    grid.height(),
                    bitmap,
                    grid.created_at().timestamp_micros(),
                    grid.updated_at().timestamp_micros(),
                ],
            )?;
            if changed == 0 {
                tracing::debug!(id = grid.id(), "Stored grid is as new or newer, skipping");
            }
            Ok(changed > 0)
        })
    }

    pub fn get_grid(&self, id: &str) -> Result<Option<Grid>, DbError> {
        let row = self.with_conn(|conn| {
            let sql = format!("SELECT {GRID_COLUMNS} FROM grids WHERE id = ?1");
            let row = conn.query_row(&sql, [id], GridRow::from_row).optional()?;
            Ok(row)
        })?;
        row.map(GridRow::into_grid).transpose()
    }

    /// All saved grids, most recently updated first.
    pub fn get_all_grids(&self) -> Result<Vec<Grid>, DbError> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {GRID_COLUMNS} FROM grids ORDER BY updated_at DESC, id ASC"
            ))?;
            let rows = stmt.query_map([], GridRow::from_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
        })?;
        rows.into_iter().map(GridRow::into_grid).collect()
    }

    /// Returns `true` if a grid was deleted.
    pub fn delete_grid(&self, id: &str) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM grids WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    /// Persist the grid currently being edited.
    pub fn save_current_grid(&self, grid: &Grid) -> Result<(), DbError> {
        let json = serde_json::to_string(grid)?;
        self.set_setting(CURRENT_GRID_KEY, &json)
    }

    pub fn load_current_grid(&self) -> Result<Option<Grid>, DbError> {
        match self.get_setting(CURRENT_GRID_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}
