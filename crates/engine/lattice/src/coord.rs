//! Fixed lattice bounds and coordinate helpers

use glam::IVec3;

/// Number of cells along each lattice axis
pub const GRID_SIZE: i32 = 7;

/// Half-extent of the lattice; coordinates span `[-HALF, HALF]`
pub const HALF: i32 = GRID_SIZE / 2;

/// World-space edge length of one voxel
pub const CELL_SIZE: f32 = 1.0;

/// Largest Manhattan distance any lattice cell can have from the origin
pub const MAX_RADIUS: i32 = 3 * HALF;

/// Manhattan distance from the origin
pub fn manhattan(cell: IVec3) -> i32 {
    cell.x.abs() + cell.y.abs() + cell.z.abs()
}

/// Whether a coordinate lies inside the lattice
pub fn in_bounds(cell: IVec3) -> bool {
    cell.x.abs() <= HALF && cell.y.abs() <= HALF && cell.z.abs() <= HALF
}

/// Iterate every lattice coordinate exactly once (z-major)
pub fn lattice_cells() -> impl Iterator<Item = IVec3> {
    (-HALF..=HALF).flat_map(|z| {
        (-HALF..=HALF).flat_map(move |y| (-HALF..=HALF).map(move |x| IVec3::new(x, y, z)))
    })
}
