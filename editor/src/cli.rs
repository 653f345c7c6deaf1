//! Command-line interface definitions and subcommand handlers.

use std::fmt::Write as _;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bitgrid::{Direction, Grid};
use clap::{Parser, Subcommand, ValueEnum};
use image::{ImageFormat, RgbaImage};
use image_processor::DitherMode;

use crate::config::SettingsManager;
use crate::history::HistoryRepository;
use crate::pipeline::{DitherParams, Editor};

// ==================== CLI Enums ====================

/// Direction the grid content moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShiftDirection {
    Up,
    Down,
    Left,
    Right,
}

impl From<ShiftDirection> for Direction {
    fn from(d: ShiftDirection) -> Self {
        match d {
            ShiftDirection::Up => Direction::Up,
            ShiftDirection::Down => Direction::Down,
            ShiftDirection::Left => Direction::Left,
            ShiftDirection::Right => Direction::Right,
        }
    }
}

/// Image quantization algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    FloydSteinberg,
    Threshold,
}

impl From<Mode> for DitherMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::FloydSteinberg => DitherMode::FloydSteinberg,
            Mode::Threshold => DitherMode::Threshold,
        }
    }
}

// ==================== CLI Arguments ====================

/// Monochrome pixel-art editor working on one persisted grid
#[derive(Parser, Debug)]
#[command(name = "pixel-editor")]
#[command(version, about = "Edit, import and export 1-bit pixel grids", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a new blank working grid
    New {
        /// Grid name (default: "Untitled N")
        name: Option<String>,
    },
    /// Print the working grid as hex text
    Show,
    /// Summarize the working grid
    Info,
    /// Rename the working grid
    Rename { name: String },
    /// Resize the working grid, keeping the top-left overlap
    Resize { width: u32, height: u32 },
    /// Move content one cell, filling the vacated edge with blank cells
    Shift { direction: ShiftDirection },
    /// Invert every cell
    Invert,
    /// Flip one cell by row-major index
    Toggle { index: usize },
    /// Reset every cell to blank
    Clear,
    /// Load hex text into the working grid at its current size
    ImportHex { file: PathBuf },
    /// Quantize an image into the working grid
    ImportImage {
        file: PathBuf,

        /// Dithering algorithm (default: DITHER_MODE setting)
        #[arg(long)]
        mode: Option<Mode>,

        /// Gray level at or above which a pixel is white, 0-200
        #[arg(long)]
        threshold: Option<u8>,

        /// Write the quantized image to this PNG file
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Only produce the preview; leave the working grid unchanged
        #[arg(long)]
        dry_run: bool,
    },
    /// Save the working grid to history
    Save {
        /// Save under a new identity named "<name> copy"
        #[arg(long)]
        copy: bool,
    },
    /// List saved grids, newest first
    History {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Make a saved grid the working grid
    Open { id: String },
    /// Delete a saved grid
    Delete { id: String },
    /// Settings management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show all settings
    List,
    /// Show one setting
    Get { key: String },
    /// Change one setting
    Set { key: String, value: String },
}

// ==================== Subcommand Handlers ====================

/// Run one subcommand and return what should be printed to stdout.
pub async fn run<R: HistoryRepository>(
    command: Command,
    editor: &mut Editor<R>,
    sm: &SettingsManager,
) -> anyhow::Result<String> {
    let output = match command {
        Command::New { name } => describe(editor.new_grid(name)?),
        Command::Show => format!("{}\n", editor.export_text()),
        Command::Info => describe(editor.grid()),
        Command::Rename { name } => describe(editor.rename(name)?),
        Command::Resize { width, height } => describe(editor.resize(width, height)?),
        Command::Shift { direction } => describe(editor.shift(direction.into())?),
        Command::Invert => describe(editor.invert()?),
        Command::Toggle { index } => describe(editor.toggle(index)?),
        Command::Clear => describe(editor.clear()?),
        Command::ImportHex { file } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            describe(editor.import_hex(&text)?)
        }
        Command::ImportImage {
            file,
            mode,
            threshold,
            preview,
            dry_run,
        } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let defaults = editor.params();
            editor.set_dither_params(DitherParams {
                mode: mode.map_or(defaults.mode, DitherMode::from),
                threshold: threshold.unwrap_or(defaults.threshold),
            })?;
            let summary = describe(editor.load_image(&bytes)?);
            if let (Some(path), Some(img)) = (preview, editor.preview_image()) {
                write_png(img, &path).await?;
                tracing::info!("Wrote preview to {}", path.display());
            }
            if dry_run {
                editor.discard_image();
                summary
            } else {
                describe(editor.confirm_image()?)
            }
        }
        Command::Save { copy } => describe(editor.save(copy)?),
        Command::History { json } => {
            let grids = editor.history()?;
            if json {
                format!("{}\n", serde_json::to_string_pretty(&grids)?)
            } else if grids.is_empty() {
                "No saved grids.\n".to_string()
            } else {
                grids.iter().map(describe).collect()
            }
        }
        Command::Open { id } => describe(editor.open_saved(&id)?),
        Command::Delete { id } => {
            editor.delete_saved(&id)?;
            format!("Deleted {id}\n")
        }
        Command::Config { action } => handle_config_action(action, sm)?,
    };
    Ok(output)
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, sm: &SettingsManager) -> anyhow::Result<String> {
    let output = match action {
        ConfigAction::List => {
            let mut out = String::new();
            for s in sm.get_all_settings()? {
                let marker = if s.is_default { "" } else { " *" };
                writeln!(out, "{}={}{}  # {}", s.key, s.value, marker, s.description)?;
            }
            out
        }
        ConfigAction::Get { key } => format!("{}\n", sm.get_setting(&key)?),
        ConfigAction::Set { key, value } => {
            sm.set_setting(&key, &value)?;
            format!("{key}={value}\n")
        }
    };
    Ok(output)
}

/// One-line summary of a grid.
pub fn describe(grid: &Grid) -> String {
    format!(
        "{} [{}] {}x{}, {} ink, updated {}\n",
        grid.name(),
        grid.id(),
        grid.width(),
        grid.height(),
        grid.ink_count(),
        grid.updated_at().format("%Y-%m-%d %H:%M:%S"),
    )
}

async fn write_png(img: &RgbaImage, path: &Path) -> anyhow::Result<()> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    tokio::fs::write(path, out.into_inner())
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
