use std::path::{Path, PathBuf};

use grid_db::Database;

use crate::config::{EditorConfig, SettingsManager};

/// Database file name inside the data directory.
pub const DB_FILE: &str = "grids.db";

/// Foundation init: env, data dir, DB, settings, config (fatal on error).
pub fn init_foundation() -> Result<(Database, EditorConfig, PathBuf), anyhow::Error> {
    load_dotenv();
    let dir = data_dir();
    let (db, config) = open_data_dir(&dir)?;
    Ok((db, config, dir))
}

/// Open (creating if needed) the database under `dir` and load the config.
pub fn open_data_dir(dir: &Path) -> Result<(Database, EditorConfig), anyhow::Error> {
    std::fs::create_dir_all(dir)?;

    let db_path = dir.join(DB_FILE);
    tracing::info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path)?;

    let sm = SettingsManager::new(db.clone());
    if let Err(e) = sm.migrate_from_env() {
        tracing::error!("Failed to migrate from env: {e}");
    }
    sm.initialize_defaults()?;

    let config = EditorConfig::load(&sm)?;
    tracing::info!(
        grid_width = config.grid_width,
        grid_height = config.grid_height,
        dither_mode = %config.dither_mode,
        dither_threshold = config.dither_threshold,
        "Settings loaded"
    );
    Ok((db, config))
}

/// Determine the data directory for the editor.
/// Priority: PIXEL_EDITOR_DATA_DIR env var > ~/.pixel-editor
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PIXEL_EDITOR_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pixel-editor")
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}
