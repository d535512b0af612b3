//! Voxel store: the current voxel map and its stable draw order

use std::collections::HashMap;

use glam::{IVec3, Vec3};

use crate::coord;
use crate::palette::ColorId;

/// Sparse voxel map; holds only non-empty, in-palette cells
pub type VoxelMap = HashMap<IVec3, ColorId>;

/// Owns the current voxel map plus a depth-ordered draw sequence.
///
/// The draw order is a permutation of the map keys sorted by ascending
/// Manhattan distance from the origin, ties broken by (x, y, z) lexical
/// order so mesh layout and reveal animation are reproducible across runs.
#[derive(Debug, Clone, Default)]
pub struct VoxelStore {
    voxels: VoxelMap,
    draw_order: Vec<IVec3>,
}

impl VoxelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new map and recompute the draw order
    pub fn replace(&mut self, voxels: VoxelMap) {
        self.draw_order = voxels.keys().copied().collect();
        self.draw_order
            .sort_unstable_by_key(|c| (coord::manhattan(*c), c.x, c.y, c.z));
        self.voxels = voxels;
    }

    /// Empty both the map and the draw order
    pub fn clear(&mut self) {
        self.voxels.clear();
        self.draw_order.clear();
    }

    pub fn voxels(&self) -> &VoxelMap {
        &self.voxels
    }

    pub fn draw_order(&self) -> &[IVec3] {
        &self.draw_order
    }

    pub fn color_of(&self, cell: IVec3) -> Option<ColorId> {
        self.voxels.get(&cell).copied()
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Largest Manhattan distance in the map, 0 when empty
    pub fn max_radius(&self) -> i32 {
        self.draw_order
            .last()
            .map(|c| coord::manhattan(*c))
            .unwrap_or(0)
    }

    /// Mean position of all voxels, origin when empty
    pub fn centroid(&self) -> Vec3 {
        if self.voxels.is_empty() {
            return Vec3::ZERO;
        }
        let sum: Vec3 = self.voxels.keys().map(|c| c.as_vec3()).sum();
        sum / self.voxels.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> VoxelMap {
        let mut map = VoxelMap::new();
        map.insert(IVec3::new(2, 0, 0), 1);
        map.insert(IVec3::new(0, 0, 0), 2);
        map.insert(IVec3::new(0, -1, 0), 3);
        map.insert(IVec3::new(1, 1, 1), 4);
        map
    }

    #[test]
    fn test_draw_order_is_permutation() {
        let mut store = VoxelStore::new();
        store.replace(sample_map());
        assert_eq!(store.draw_order().len(), store.len());
        for cell in store.draw_order() {
            assert!(store.voxels().contains_key(cell));
        }
    }

    #[test]
    fn test_draw_order_monotone_in_manhattan() {
        let mut store = VoxelStore::new();
        store.replace(sample_map());
        let distances: Vec<i32> = store
            .draw_order()
            .iter()
            .map(|c| coord::manhattan(*c))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(distances[0], 0);
    }

    #[test]
    fn test_replace_is_idempotent() {
        let mut a = VoxelStore::new();
        let mut b = VoxelStore::new();
        a.replace(sample_map());
        b.replace(sample_map());
        b.replace(sample_map());
        assert_eq!(a.draw_order(), b.draw_order());
        assert_eq!(a.voxels(), b.voxels());
    }

    #[test]
    fn test_clear() {
        let mut store = VoxelStore::new();
        store.replace(sample_map());
        store.clear();
        assert!(store.is_empty());
        assert!(store.draw_order().is_empty());
        assert_eq!(store.max_radius(), 0);
        assert_eq!(store.centroid(), Vec3::ZERO);
    }

    #[test]
    fn test_max_radius() {
        let mut store = VoxelStore::new();
        store.replace(sample_map());
        assert_eq!(store.max_radius(), 3);
    }

    #[test]
    fn test_centroid_single_voxel() {
        let mut store = VoxelStore::new();
        let mut map = VoxelMap::new();
        map.insert(IVec3::new(2, -1, 3), 5);
        store.replace(map);
        assert_eq!(store.centroid(), Vec3::new(2.0, -1.0, 3.0));
    }
}
