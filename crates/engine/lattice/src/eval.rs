//! Rule evaluation over the bounded lattice
//!
//! A rule is any coordinate→color function that may fail independently on
//! every call. Evaluation never invokes the rule outside the lattice, and a
//! failing cell is simply an empty cell; one bad coordinate must never abort
//! the whole sweep.

use thiserror::Error;

use crate::coord;
use crate::palette::{self, ColorId};
use crate::voxel::VoxelMap;

/// Failure of a single rule invocation
#[derive(Error, Debug, Clone)]
#[error("rule failed: {0}")]
pub struct RuleError(pub String);

/// A user-supplied rule mapping lattice coordinates to color ids
pub trait Rule {
    /// May fail independently for every cell
    fn color_at(&self, x: i32, y: i32, z: i32) -> Result<ColorId, RuleError>;
}

/// Constant-zero rule; the fallback installed after a failed compile
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroRule;

impl Rule for ZeroRule {
    fn color_at(&self, _x: i32, _y: i32, _z: i32) -> Result<ColorId, RuleError> {
        Ok(0)
    }
}

impl<F> Rule for F
where
    F: Fn(i32, i32, i32) -> Result<ColorId, RuleError>,
{
    fn color_at(&self, x: i32, y: i32, z: i32) -> Result<ColorId, RuleError> {
        self(x, y, z)
    }
}

/// Apply a rule to every lattice cell and collect the non-empty results.
///
/// Cells whose invocation fails, returns 0, or returns an id outside the
/// palette are omitted from the map.
pub fn evaluate<R: Rule + ?Sized>(rule: &R) -> VoxelMap {
    let mut voxels = VoxelMap::new();
    for cell in coord::lattice_cells() {
        let Ok(id) = rule.color_at(cell.x, cell.y, cell.z) else {
            continue;
        };
        if palette::palette_contains(id) {
            voxels.insert(cell, id);
        }
    }
    voxels
}
