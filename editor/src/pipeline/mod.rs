//! The editing pipeline: working grid, image import and saved history.
//!
//! [`Editor`] owns the grid being edited. Every operation that changes its
//! content builds a new [`Grid`] through the pure transforms, persists it as
//! the working grid and only then swaps it in, so a failed operation leaves
//! the previous state in place.
//!
//! Image import keeps the decoded (and downscaled) source buffer. Each change
//! of dithering parameters re-quantizes a fresh copy of that buffer, so the
//! preview depends only on the source and the current parameters.

use bitgrid::{Direction, Grid, GridError};
use image::RgbaImage;
use image_processor::DitherMode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::history::HistoryRepository;

/// Upper bound of the dithering threshold accepted from users.
pub const MAX_THRESHOLD: u8 = 200;

/// Quantization settings for image import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DitherParams {
    pub mode: DitherMode,
    pub threshold: u8,
}

impl Default for DitherParams {
    fn default() -> Self {
        Self {
            mode: DitherMode::FloydSteinberg,
            threshold: image_processor::dither::DEFAULT_THRESHOLD,
        }
    }
}

impl DitherParams {
    pub fn validate(&self) -> Result<()> {
        if self.threshold > MAX_THRESHOLD {
            return Err(EditorError::ThresholdOutOfRange(self.threshold));
        }
        Ok(())
    }
}

/// An image being imported, not yet applied to the working grid.
struct PendingImage {
    source: RgbaImage,
    quantized: RgbaImage,
    preview: Grid,
}

impl PendingImage {
    fn quantize(source: RgbaImage, params: DitherParams) -> std::result::Result<Self, GridError> {
        let quantized = image_processor::dither(source.clone(), params.mode, params.threshold);
        let preview = image_processor::to_grid(&quantized, "preview")?;
        Ok(Self {
            source,
            quantized,
            preview,
        })
    }
}

/// Orchestrates edits of one working grid against a history store.
pub struct Editor<R: HistoryRepository> {
    repo: R,
    grid: Grid,
    pending: Option<PendingImage>,
    params: DitherParams,
    new_width: u16,
    new_height: u16,
    max_image_dimension: u32,
}

impl<R: HistoryRepository> Editor<R> {
    /// Restore the persisted working grid, or start a blank one.
    pub fn open(repo: R, config: &EditorConfig) -> Result<Self> {
        let restored = repo.load_current()?;
        let params = config.dither_params();
        params.validate()?;
        let (new_width, new_height) =
            check_size(u32::from(config.grid_width), u32::from(config.grid_height))?;
        let max = config.image_max_dimension;
        check_size(max, max)?;

        let grid = match restored {
            Some(grid) => {
                info!(id = grid.id(), name = grid.name(), "Restored working grid");
                grid
            }
            None => {
                let grid = Grid::new(untitled_name(&repo)?, new_width, new_height)?;
                repo.store_current(&grid)?;
                info!(id = grid.id(), name = grid.name(), "Started blank working grid");
                grid
            }
        };

        Ok(Self {
            repo,
            grid,
            pending: None,
            params,
            new_width,
            new_height,
            max_image_dimension: max,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn params(&self) -> DitherParams {
        self.params
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Replace the working grid with a blank one of the configured size.
    pub fn new_grid(&mut self, name: Option<String>) -> Result<&Grid> {
        let name = match name {
            Some(name) => name,
            None => untitled_name(&self.repo)?,
        };
        let grid = Grid::new(name, self.new_width, self.new_height)?;
        info!(id = grid.id(), name = grid.name(), "New working grid");
        self.commit(grid)
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<&Grid> {
        let mut grid = self.grid.clone();
        grid.rename(name);
        self.commit(grid)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<&Grid> {
        let (width, height) = check_size(width, height)?;
        let grid = self.grid.resized(width, height)?;
        self.commit(grid)
    }

    pub fn shift(&mut self, direction: Direction) -> Result<&Grid> {
        let grid = self.grid.shifted(direction);
        self.commit(grid)
    }

    pub fn invert(&mut self) -> Result<&Grid> {
        let grid = self.grid.inverted();
        self.commit(grid)
    }

    pub fn toggle(&mut self, index: usize) -> Result<&Grid> {
        let grid = self.grid.toggled(index)?;
        self.commit(grid)
    }

    pub fn clear(&mut self) -> Result<&Grid> {
        let grid = self.grid.cleared();
        self.commit(grid)
    }

    /// Decode hex text into the working grid at its current size.
    pub fn import_hex(&mut self, text: &str) -> Result<&Grid> {
        let bytes = match bitgrid::parse_hex(text) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Hex import rejected: {e}");
                return Err(EditorError::InvalidImportFormat(e));
            }
        };
        let (width, height) = (self.grid.width(), self.grid.height());
        let expected = bitgrid::bytes_per_row(width) * usize::from(height);
        if bytes.len() != expected {
            debug!(got = bytes.len(), expected, "Hex import length differs from grid size");
        }
        let cells = bitgrid::decode(&bytes, width, height);
        let grid = self.grid.with_cells(width, height, cells)?;
        info!(id = grid.id(), bytes = bytes.len(), "Imported hex");
        self.commit(grid)
    }

    pub fn export_text(&self) -> String {
        bitgrid::export(&self.grid)
    }

    /// Decode an image and quantize it into a preview grid.
    ///
    /// The working grid is not changed until [`Editor::confirm_image`].
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<&Grid> {
        let source = image_processor::prepare_source(bytes, self.max_image_dimension)?;
        info!(
            width = source.width(),
            height = source.height(),
            mode = %self.params.mode,
            threshold = self.params.threshold,
            "Loaded image"
        );
        let pending = PendingImage::quantize(source, self.params)?;
        Ok(&self.pending.insert(pending).preview)
    }

    /// Change dithering parameters, re-quantizing a loaded image from its source.
    pub fn set_dither_params(&mut self, params: DitherParams) -> Result<Option<&Grid>> {
        params.validate()?;
        self.params = params;
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };
        debug!(mode = %params.mode, threshold = params.threshold, "Re-quantizing image");
        let pending = PendingImage::quantize(pending.source, params)?;
        Ok(Some(&self.pending.insert(pending).preview))
    }

    pub fn preview(&self) -> Option<&Grid> {
        self.pending.as_ref().map(|p| &p.preview)
    }

    /// The quantized buffer behind [`Editor::preview`].
    pub fn preview_image(&self) -> Option<&RgbaImage> {
        self.pending.as_ref().map(|p| &p.quantized)
    }

    /// Apply the previewed image to the working grid, keeping its identity.
    pub fn confirm_image(&mut self) -> Result<&Grid> {
        let preview = &self.pending.as_ref().ok_or(EditorError::NoImageLoaded)?.preview;
        let grid = self
            .grid
            .with_cells(preview.width(), preview.height(), preview.cells().to_vec())?;
        info!(id = grid.id(), width = grid.width(), height = grid.height(), "Applied image");
        self.commit(grid)?;
        self.pending = None;
        Ok(&self.grid)
    }

    /// Drop a loaded image without touching the working grid.
    pub fn discard_image(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Save the working grid to history.
    ///
    /// With `as_copy` the saved grid gets a new identity named "<name> copy",
    /// and that copy becomes the working grid.
    pub fn save(&mut self, as_copy: bool) -> Result<&Grid> {
        let grid = if as_copy {
            self.grid.duplicate(format!("{} copy", self.grid.name()))
        } else {
            let mut grid = self.grid.clone();
            grid.touch();
            grid
        };
        let written = self.repo.save(&grid)?;
        if !written {
            warn!(id = grid.id(), "Saved grid already up to date");
        }
        info!(id = grid.id(), name = grid.name(), as_copy, "Saved grid");
        self.commit(grid)
    }

    pub fn history(&self) -> Result<Vec<Grid>> {
        Ok(self.repo.list()?)
    }

    /// Make a saved grid the working grid.
    pub fn open_saved(&mut self, id: &str) -> Result<&Grid> {
        let grid = self
            .repo
            .get(id)?
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;
        info!(id = grid.id(), name = grid.name(), "Opened saved grid");
        self.commit(grid)
    }

    /// Remove a saved grid. The working grid is independent and stays as is.
    pub fn delete_saved(&mut self, id: &str) -> Result<()> {
        if !self.repo.delete(id)? {
            return Err(EditorError::NotFound(id.to_string()));
        }
        info!(id, "Deleted saved grid");
        Ok(())
    }

    fn commit(&mut self, grid: Grid) -> Result<&Grid> {
        self.repo.store_current(&grid)?;
        self.grid = grid;
        Ok(&self.grid)
    }
}

fn check_size(width: u32, height: u32) -> Result<(u16, u16)> {
    bitgrid::check_dimensions(width, height)
        .map_err(|_| EditorError::DimensionOutOfRange { width, height })
}

fn untitled_name<R: HistoryRepository>(repo: &R) -> Result<String> {
    let count = repo.list()?.len();
    Ok(format!("Untitled {}", count + 1))
}

#[cfg(test)]
mod tests;
