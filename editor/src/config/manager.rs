//! SettingsManager: DB-backed settings with defaults and env migration.

use grid_db::Database;

use super::SettingInfo;
use super::defaults::{DEFAULT_SETTINGS, get_default};
use super::validation::validate_setting;

/// Wraps [`Database`] to provide high-level settings operations.
pub struct SettingsManager {
    db: Database,
}

impl SettingsManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get a setting value. Falls back to default if not in DB.
    pub fn get_setting(&self, key: &str) -> Result<String, anyhow::Error> {
        if let Some(val) = self.db.get_setting(key)? {
            return Ok(val);
        }
        match get_default(key) {
            Some(default) => Ok(default.to_string()),
            None => anyhow::bail!("setting not found: {key}"),
        }
    }

    /// Set a setting value with validation.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        if !DEFAULT_SETTINGS.contains_key(key) {
            anyhow::bail!("unknown setting key: {key}");
        }
        validate_setting(key, value)
            .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;

        self.db.set_setting(key, value)?;
        tracing::info!(key, value, "Setting updated");
        Ok(())
    }

    /// All known settings sorted by key, filling in defaults for missing ones.
    pub fn get_all_settings(&self) -> Result<Vec<SettingInfo>, anyhow::Error> {
        let db_settings = self.db.get_all_settings()?;
        let mut result: Vec<SettingInfo> = DEFAULT_SETTINGS
            .values()
            .map(|def| {
                let stored = db_settings.get(def.key);
                SettingInfo {
                    key: def.key.to_string(),
                    value: stored.map_or_else(|| def.default.to_string(), Clone::clone),
                    description: def.description.to_string(),
                    is_default: stored.is_none_or(|v| v == def.default),
                }
            })
            .collect();
        result.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(result)
    }

    /// Initialize default settings in DB (skip existing).
    pub fn initialize_defaults(&self) -> Result<(), anyhow::Error> {
        for (key, def) in DEFAULT_SETTINGS.iter() {
            if self.db.get_setting(key)?.is_some() {
                continue;
            }
            self.db.set_setting(key, def.default)?;
        }
        Ok(())
    }

    /// Migrate settings from environment variables to DB (one-time).
    ///
    /// Invalid env values are skipped with a warning.
    pub fn migrate_from_env(&self) -> Result<u32, anyhow::Error> {
        let mut migrated = 0u32;
        for key in DEFAULT_SETTINGS.keys() {
            if self.db.get_setting(key)?.is_some() {
                continue;
            }
            let Ok(env_val) = std::env::var(key) else {
                continue;
            };
            if env_val.is_empty() {
                continue;
            }
            if let Err(e) = validate_setting(key, &env_val) {
                tracing::warn!("Ignoring env setting {key}={env_val}: {e}");
                continue;
            }
            self.db.set_setting(key, &env_val)?;
            tracing::info!("Migrated setting from env: {key}");
            migrated += 1;
        }
        if migrated > 0 {
            tracing::info!("Migration completed: {migrated} settings migrated");
        }
        Ok(migrated)
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}
