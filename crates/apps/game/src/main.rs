//! Voxel rule-programming puzzle game
//!
//! Two camera-linked viewports: a read-only target preview on top and the
//! live scene built from the player's `rule(x, y, z)` function below, with
//! the code editor and level controls in a side panel.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

mod app;
mod levels;
mod ui;

use app::GameApp;

#[derive(Parser, Debug)]
#[command(name = "game", about = "Voxel rule-programming puzzle game")]
struct Args {
    /// Directory holding level JSON files
    #[arg(long, default_value = "levels")]
    levels_dir: PathBuf,

    /// Progress file, created on first completion
    #[arg(long, default_value = "progress.json")]
    progress_file: PathBuf,

    /// Settings file, read once at startup
    #[arg(long, default_value = "settings.json")]
    settings_file: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let event_loop = EventLoop::new()?;
    let mut app = GameApp::new(args.levels_dir, args.progress_file, args.settings_file);
    event_loop.run_app(&mut app)?;
    Ok(())
}
