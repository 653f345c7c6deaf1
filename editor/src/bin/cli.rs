//! Command-line entry point.
//!
//! Loads settings and the working grid from the data directory, runs one
//! subcommand and prints its output. Logs go to stderr so exported text on
//! stdout can be piped.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pixel_editor_lib::Editor;
use pixel_editor_lib::cli::{self, Args};
use pixel_editor_lib::config::SettingsManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let (db, config, dir) = pixel_editor_lib::init_foundation()?;
    tracing::debug!("Data directory: {}", dir.display());

    let sm = SettingsManager::new(db.clone());
    let mut editor = Editor::open(db, &config)?;

    let output = cli::run(args.command, &mut editor, &sm).await?;
    print!("{output}");
    Ok(())
}
