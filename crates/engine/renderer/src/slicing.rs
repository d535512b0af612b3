//! Axis slicing: hide voxels beyond a per-axis cutoff

use glam::IVec3;
use lattice::HALF;

/// One axis of the slicing control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSlice {
    pub enabled: bool,
    /// Highest coordinate still shown when enabled
    pub cutoff: i32,
}

impl Default for AxisSlice {
    fn default() -> Self {
        Self {
            enabled: false,
            cutoff: HALF,
        }
    }
}

impl AxisSlice {
    fn admits(&self, coord: i32) -> bool {
        !self.enabled || coord <= self.cutoff
    }
}

/// Slicing state for all three axes, disabled by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlicingConfig {
    pub x: AxisSlice,
    pub y: AxisSlice,
    pub z: AxisSlice,
}

impl SlicingConfig {
    /// Whether a cell survives every enabled cutoff
    pub fn admits(&self, cell: IVec3) -> bool {
        self.x.admits(cell.x) && self.y.admits(cell.y) && self.z.admits(cell.z)
    }

    pub fn any_enabled(&self) -> bool {
        self.x.enabled || self.y.enabled || self.z.enabled
    }
}
