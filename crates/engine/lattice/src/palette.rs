//! Fixed color palette
//!
//! Color ids are 1-based small integers; id 0 (or anything past the table)
//! means "empty, no voxel". The table is a process-wide constant.

use glam::Vec3;

/// Key into the palette; `0` means empty
pub type ColorId = u8;

/// Number of colors in the palette
pub const PALETTE_LEN: usize = 8;

const PALETTE: [Vec3; PALETTE_LEN] = [
    Vec3::new(1.0, 0.2, 0.2),    // 1 red
    Vec3::new(1.0, 0.6, 0.0),    // 2 orange
    Vec3::new(1.0, 1.0, 0.0),    // 3 yellow
    Vec3::new(0.1, 1.0, 0.1),    // 4 green
    Vec3::new(0.0, 1.0, 1.0),    // 5 cyan
    Vec3::new(0.3, 0.5, 1.0),    // 6 blue
    Vec3::new(1.0, 0.2, 1.0),    // 7 magenta
    Vec3::new(0.95, 0.95, 0.95), // 8 white
];

/// Normalized RGB for a color id, `None` for empty or unmapped ids
pub fn palette_color(id: ColorId) -> Option<Vec3> {
    if id == 0 {
        return None;
    }
    PALETTE.get(id as usize - 1).copied()
}

/// Whether the id maps to a palette color
pub fn palette_contains(id: ColorId) -> bool {
    id >= 1 && (id as usize) <= PALETTE_LEN
}

/// All valid color ids in ascending order
pub fn palette_ids() -> impl Iterator<Item = ColorId> {
    1..=PALETTE_LEN as ColorId
}
