//! Key-value settings store.
//!
//! Holds editor settings and the serialized working grid.

use std::collections::HashMap;

use crate::{Database, DbError, OptionalExt};

const UPSERT_SETTING: &str = "INSERT INTO settings (key, value, updated_at)
     VALUES (?1, ?2, CURRENT_TIMESTAMP)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP";

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>, DbError> {
        self.with_conn(|conn| {
            let value = conn
                .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| row.get(0))
                .optional()?;
            Ok(value)
        })
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute(UPSERT_SETTING, [key, value])?;
            Ok(())
        })
    }

    /// Every stored key, including ones no default is defined for.
    pub fn get_all_settings(&self) -> Result<HashMap<String, String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
            let pairs = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            pairs.collect::<Result<HashMap<_, _>, _>>().map_err(DbError::from)
        })
    }
}
