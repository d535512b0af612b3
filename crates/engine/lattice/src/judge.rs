//! Completion check and scoring

use crate::voxel::VoxelMap;

/// Exact map equality: same key set, same color per key
pub fn is_complete(live: &VoxelMap, target: &VoxelMap) -> bool {
    live == target
}

/// Score for a completed level: shorter code scores higher, never negative
pub fn score(code: &str) -> u32 {
    let len = code.trim().chars().count() as i64;
    (1000 - 2 * len).max(0) as u32
}

/// How a completion relates to the stored best for the level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// First completion or a better score; persisted
    NewBest { score: u32 },
    /// Completed again without beating the stored best
    Repeat { score: u32 },
}

impl CompletionOutcome {
    pub fn score(&self) -> u32 {
        match self {
            Self::NewBest { score } | Self::Repeat { score } => *score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    #[test]
    fn test_empty_maps_complete() {
        assert!(is_complete(&VoxelMap::new(), &VoxelMap::new()));
    }

    #[test]
    fn test_same_key_same_color() {
        let mut live = VoxelMap::new();
        let mut target = VoxelMap::new();
        live.insert(IVec3::ZERO, 1);
        target.insert(IVec3::ZERO, 1);
        assert!(is_complete(&live, &target));
    }

    #[test]
    fn test_same_key_different_color() {
        let mut live = VoxelMap::new();
        let mut target = VoxelMap::new();
        live.insert(IVec3::ZERO, 1);
        target.insert(IVec3::ZERO, 2);
        assert!(!is_complete(&live, &target));
    }

    #[test]
    fn test_missing_key() {
        let mut target = VoxelMap::new();
        target.insert(IVec3::new(1, 0, 0), 1);
        assert!(!is_complete(&VoxelMap::new(), &target));
    }

    #[test]
    fn test_score_decreases_with_length() {
        assert_eq!(score(&"a".repeat(100)), 800);
        assert_eq!(score(&"a".repeat(600)), 0);
        assert_eq!(score(""), 1000);
    }

    #[test]
    fn test_score_ignores_surrounding_whitespace() {
        assert_eq!(score("  return 1  \n"), score("return 1"));
    }
}
