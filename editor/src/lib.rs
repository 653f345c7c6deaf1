pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod pipeline;

pub use bootstrap::{data_dir, init_foundation};
pub use error::EditorError;
pub use history::{HistoryRepository, MemoryHistory};
pub use pipeline::{DitherParams, Editor};
