//! Mesh builder: one fixed 24-vertex cube record per voxel
//!
//! Vertices are interleaved `[position(3), normal(3), color(3)]`, emitted in
//! draw order so the renderer can address voxel `i` at a fixed offset. Core
//! GL has no quad primitive, so static index tables turn each face quad into
//! two triangles (fill pass) and four edges (line pass).

use lattice::{palette_color, VoxelStore, CELL_SIZE};

const HS: f32 = CELL_SIZE / 2.0;

/// Vertices per voxel record: 6 faces × 4 corners
pub const VERTS_PER_VOXEL: usize = 24;

/// Floats per vertex: position, normal, color
pub const FLOATS_PER_VERTEX: usize = 9;

/// Floats per voxel record
pub const FLOATS_PER_VOXEL: usize = VERTS_PER_VOXEL * FLOATS_PER_VERTEX;

/// Triangle indices per voxel: 6 faces × 2 triangles × 3
pub const TRI_INDICES_PER_VOXEL: usize = 36;

/// Line indices per voxel: 6 faces × 4 edges × 2
pub const LINE_INDICES_PER_VOXEL: usize = 48;

// Unit cube corners, one quad per face, wound counter-clockwise seen from
// outside: +Z, -Z, +X, -X, +Y, -Y.
#[rustfmt::skip]
const CUBE_VERTICES: [[f32; 3]; VERTS_PER_VOXEL] = [
    [-HS, -HS,  HS], [ HS, -HS,  HS], [ HS,  HS,  HS], [-HS,  HS,  HS],
    [-HS, -HS, -HS], [-HS,  HS, -HS], [ HS,  HS, -HS], [ HS, -HS, -HS],
    [ HS, -HS, -HS], [ HS,  HS, -HS], [ HS,  HS,  HS], [ HS, -HS,  HS],
    [-HS, -HS,  HS], [-HS,  HS,  HS], [-HS,  HS, -HS], [-HS, -HS, -HS],
    [-HS,  HS,  HS], [ HS,  HS,  HS], [ HS,  HS, -HS], [-HS,  HS, -HS],
    [-HS, -HS, -HS], [ HS, -HS, -HS], [ HS, -HS,  HS], [-HS, -HS,  HS],
];

#[rustfmt::skip]
const CUBE_NORMALS: [[f32; 3]; VERTS_PER_VOXEL] = [
    [ 0.0,  0.0,  1.0], [ 0.0,  0.0,  1.0], [ 0.0,  0.0,  1.0], [ 0.0,  0.0,  1.0],
    [ 0.0,  0.0, -1.0], [ 0.0,  0.0, -1.0], [ 0.0,  0.0, -1.0], [ 0.0,  0.0, -1.0],
    [ 1.0,  0.0,  0.0], [ 1.0,  0.0,  0.0], [ 1.0,  0.0,  0.0], [ 1.0,  0.0,  0.0],
    [-1.0,  0.0,  0.0], [-1.0,  0.0,  0.0], [-1.0,  0.0,  0.0], [-1.0,  0.0,  0.0],
    [ 0.0,  1.0,  0.0], [ 0.0,  1.0,  0.0], [ 0.0,  1.0,  0.0], [ 0.0,  1.0,  0.0],
    [ 0.0, -1.0,  0.0], [ 0.0, -1.0,  0.0], [ 0.0, -1.0,  0.0], [ 0.0, -1.0,  0.0],
];

/// Build the interleaved vertex buffer for every voxel in draw order.
///
/// Linear in voxel count; an empty store yields an empty buffer.
pub fn build_vertex_data(store: &VoxelStore) -> Vec<f32> {
    let mut data = Vec::with_capacity(store.len() * FLOATS_PER_VOXEL);
    for cell in store.draw_order() {
        let Some(id) = store.color_of(*cell) else {
            continue;
        };
        let Some(color) = palette_color(id) else {
            continue;
        };
        let origin = cell.as_vec3() * CELL_SIZE;
        for (position, normal) in CUBE_VERTICES.iter().zip(CUBE_NORMALS.iter()) {
            data.extend_from_slice(&[
                position[0] + origin.x,
                position[1] + origin.y,
                position[2] + origin.z,
                normal[0],
                normal[1],
                normal[2],
                color.x,
                color.y,
                color.z,
            ]);
        }
    }
    data
}

/// Triangle indices for `voxel_count` consecutive cube records
pub fn fill_indices(voxel_count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(voxel_count * TRI_INDICES_PER_VOXEL);
    for voxel in 0..voxel_count {
        let base = (voxel * VERTS_PER_VOXEL) as u32;
        for face in 0..6u32 {
            let f = base + face * 4;
            indices.extend_from_slice(&[f, f + 1, f + 2, f, f + 2, f + 3]);
        }
    }
    indices
}

/// Edge indices for `voxel_count` consecutive cube records
pub fn line_indices(voxel_count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(voxel_count * LINE_INDICES_PER_VOXEL);
    for voxel in 0..voxel_count {
        let base = (voxel * VERTS_PER_VOXEL) as u32;
        for face in 0..6u32 {
            let f = base + face * 4;
            indices.extend_from_slice(&[f, f + 1, f + 1, f + 2, f + 2, f + 3, f + 3, f]);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use lattice::VoxelMap;

    fn store_with(cells: &[(IVec3, u8)]) -> VoxelStore {
        let mut map = VoxelMap::new();
        for (cell, id) in cells {
            map.insert(*cell, *id);
        }
        let mut store = VoxelStore::new();
        store.replace(map);
        store
    }

    #[test]
    fn test_empty_store_empty_buffer() {
        assert!(build_vertex_data(&VoxelStore::new()).is_empty());
    }

    #[test]
    fn test_buffer_length_per_voxel() {
        let store = store_with(&[
            (IVec3::ZERO, 1),
            (IVec3::new(1, 0, 0), 2),
            (IVec3::new(0, 2, 0), 3),
        ]);
        let data = build_vertex_data(&store);
        assert_eq!(data.len(), 3 * FLOATS_PER_VOXEL);
    }

    #[test]
    fn test_records_follow_draw_order() {
        let store = store_with(&[(IVec3::new(2, 0, 0), 1), (IVec3::ZERO, 2)]);
        let data = build_vertex_data(&store);
        // First record is the origin voxel (closer in Manhattan distance);
        // its first vertex is the cube corner at (-0.5, -0.5, 0.5).
        assert_eq!(&data[0..3], &[-HS, -HS, HS]);
        // Second record is offset by the voxel coordinate.
        let second = FLOATS_PER_VOXEL;
        assert_eq!(&data[second..second + 3], &[2.0 - HS, -HS, HS]);
    }

    #[test]
    fn test_vertex_carries_palette_color() {
        let store = store_with(&[(IVec3::ZERO, 1)]);
        let data = build_vertex_data(&store);
        let color = palette_color(1).unwrap();
        for vertex in 0..VERTS_PER_VOXEL {
            let at = vertex * FLOATS_PER_VERTEX + 6;
            assert_eq!(&data[at..at + 3], &[color.x, color.y, color.z]);
        }
    }

    #[test]
    fn test_normals_are_axis_aligned_units() {
        let store = store_with(&[(IVec3::ZERO, 5)]);
        let data = build_vertex_data(&store);
        for vertex in 0..VERTS_PER_VOXEL {
            let at = vertex * FLOATS_PER_VERTEX + 3;
            let n = &data[at..at + 3];
            let length_sq: f32 = n.iter().map(|c| c * c).sum();
            assert!((length_sq - 1.0).abs() < 1e-6);
            assert_eq!(n.iter().filter(|c| **c != 0.0).count(), 1);
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        let store = store_with(&[(IVec3::new(1, -1, 0), 4), (IVec3::ZERO, 8)]);
        assert_eq!(build_vertex_data(&store), build_vertex_data(&store));
    }

    #[test]
    fn test_index_tables() {
        let fill = fill_indices(2);
        let line = line_indices(2);
        assert_eq!(fill.len(), 2 * TRI_INDICES_PER_VOXEL);
        assert_eq!(line.len(), 2 * LINE_INDICES_PER_VOXEL);
        assert!(fill.iter().all(|i| (*i as usize) < 2 * VERTS_PER_VOXEL));
        assert!(line.iter().all(|i| (*i as usize) < 2 * VERTS_PER_VOXEL));
        // Second voxel's indices address only its own record.
        assert!(fill[TRI_INDICES_PER_VOXEL..]
            .iter()
            .all(|i| (*i as usize) >= VERTS_PER_VOXEL));
    }
}
