//! Voxel lattice core for the puzzle game
//!
//! This crate provides:
//! - **Lattice**: the fixed bounded coordinate grid rules are evaluated over
//! - **Palette**: the immutable color table keyed by small integer ids
//! - **VoxelStore**: the current voxel map plus its Manhattan-sorted draw order
//! - **Rule evaluation**: applying a fallible coordinate→color rule per cell
//! - **Judge**: completion check against a target map and scoring
//! - **Levels / progress / settings**: the JSON files the game persists
//!
//! No rendering or scripting lives here; the renderer and the Lua rule
//! engine depend on this crate, never the other way around.

mod coord;
mod error;
mod eval;
mod judge;
mod level;
mod palette;
mod progress;
mod settings;
mod voxel;

pub use coord::{in_bounds, lattice_cells, manhattan, CELL_SIZE, GRID_SIZE, HALF, MAX_RADIUS};
pub use error::{Error, Result};
pub use eval::{evaluate, Rule, RuleError, ZeroRule};
pub use judge::{is_complete, score, CompletionOutcome};
pub use level::{discover_levels, save_custom_level, Level};
pub use palette::{palette_color, palette_contains, palette_ids, ColorId, PALETTE_LEN};
pub use progress::{LevelProgress, ProgressStore};
pub use settings::Settings;
pub use voxel::{VoxelMap, VoxelStore};
