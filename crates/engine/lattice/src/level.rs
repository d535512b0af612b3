//! Level files: a named target voxel pattern stored as JSON
//!
//! Format: `{"name": "...", "blocks": [{"pos": [x, y, z], "color": id}]}`.
//! Files whose blocks fall outside the lattice or the palette are rejected,
//! so a loaded target always satisfies the same invariants as a live map.

use std::fs;
use std::path::{Path, PathBuf};

use glam::IVec3;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::coord;
use crate::error::{Error, Result};
use crate::palette::{self, ColorId};
use crate::voxel::VoxelMap;

#[derive(Debug, Serialize, Deserialize)]
struct LevelFile {
    name: String,
    blocks: Vec<BlockEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BlockEntry {
    pos: [i32; 3],
    color: ColorId,
}

/// A loaded level: id (file stem), display name and target pattern
#[derive(Debug, Clone)]
pub struct Level {
    pub id: String,
    pub name: String,
    pub target: VoxelMap,
}

impl Level {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let file: LevelFile = serde_json::from_str(&text)?;

        let mut target = VoxelMap::new();
        for block in &file.blocks {
            let cell = IVec3::from(block.pos);
            if !coord::in_bounds(cell) {
                return Err(Error::InvalidLevel {
                    path: path.display().to_string(),
                    reason: format!("block {:?} outside the lattice", block.pos),
                });
            }
            if !palette::palette_contains(block.color) {
                return Err(Error::InvalidLevel {
                    path: path.display().to_string(),
                    reason: format!("block {:?} has unmapped color {}", block.pos, block.color),
                });
            }
            target.insert(cell, block.color);
        }

        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            id,
            name: file.name,
            target,
        })
    }

    /// Leading integer in the level name, used for menu ordering
    pub fn sort_number(&self) -> Option<u32> {
        let digits: String = self
            .name
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }
}

/// Scan a directory for `*.json` level files.
///
/// Unreadable or invalid files are logged and skipped; a missing directory
/// degrades to an empty list. Levels are ordered by the leading number in
/// their name, unnumbered levels last.
pub fn discover_levels(dir: &Path) -> Vec<Level> {
    let mut levels = Vec::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("cannot read level directory {}: {}", dir.display(), e);
            return levels;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match Level::load(&path) {
            Ok(level) => levels.push(level),
            Err(e) => warn!("skipping level {}: {}", path.display(), e),
        }
    }

    levels.sort_by(|a, b| {
        let ka = a.sort_number().unwrap_or(u32::MAX);
        let kb = b.sort_number().unwrap_or(u32::MAX);
        ka.cmp(&kb).then_with(|| a.name.cmp(&b.name))
    });

    info!("loaded {} levels from {}", levels.len(), dir.display());
    levels
}

/// Write the given voxels to the first free `custom_level_N.json` in `dir`
pub fn save_custom_level(dir: &Path, name: &str, voxels: &VoxelMap) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let mut blocks: Vec<BlockEntry> = voxels
        .iter()
        .map(|(cell, id)| BlockEntry {
            pos: [cell.x, cell.y, cell.z],
            color: *id,
        })
        .collect();
    blocks.sort_by_key(|b| b.pos);

    let file = LevelFile {
        name: name.to_string(),
        blocks,
    };

    let mut index = 1;
    let path = loop {
        let candidate = dir.join(format!("custom_level_{index}.json"));
        if !candidate.exists() {
            break candidate;
        }
        index += 1;
    };

    fs::write(&path, serde_json::to_string_pretty(&file)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_level(dir: &Path, file: &str, json: &str) -> PathBuf {
        let path = dir.join(file);
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_load_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_level(
            dir.path(),
            "cross.json",
            r#"{"name": "3 Cross", "blocks": [
                {"pos": [0, 0, 0], "color": 1},
                {"pos": [1, 0, 0], "color": 2}
            ]}"#,
        );
        let level = Level::load(&path).unwrap();
        assert_eq!(level.id, "cross");
        assert_eq!(level.name, "3 Cross");
        assert_eq!(level.target.len(), 2);
        assert_eq!(level.sort_number(), Some(3));
    }

    #[test]
    fn test_reject_unmapped_color() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_level(
            dir.path(),
            "bad.json",
            r#"{"name": "x", "blocks": [{"pos": [0, 0, 0], "color": 9}]}"#,
        );
        assert!(matches!(
            Level::load(&path),
            Err(Error::InvalidLevel { .. })
        ));
    }

    #[test]
    fn test_reject_out_of_lattice_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_level(
            dir.path(),
            "far.json",
            r#"{"name": "x", "blocks": [{"pos": [4, 0, 0], "color": 1}]}"#,
        );
        assert!(matches!(
            Level::load(&path),
            Err(Error::InvalidLevel { .. })
        ));
    }

    #[test]
    fn test_discover_orders_by_leading_number() {
        let dir = tempfile::tempdir().unwrap();
        write_level(
            dir.path(),
            "b.json",
            r#"{"name": "10 Tower", "blocks": []}"#,
        );
        write_level(dir.path(), "a.json", r#"{"name": "2 Dot", "blocks": []}"#);
        write_level(
            dir.path(),
            "c.json",
            r#"{"name": "Freeform", "blocks": []}"#,
        );
        write_level(dir.path(), "broken.json", "not json at all");
        write_level(dir.path(), "notes.txt", "ignored");

        let levels = discover_levels(dir.path());
        let names: Vec<&str> = levels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["2 Dot", "10 Tower", "Freeform"]);
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(discover_levels(&missing).is_empty());
    }

    #[test]
    fn test_save_custom_picks_free_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut voxels = VoxelMap::new();
        voxels.insert(IVec3::new(0, 1, 0), 4);

        let first = save_custom_level(dir.path(), "Mine", &voxels).unwrap();
        let second = save_custom_level(dir.path(), "Mine again", &voxels).unwrap();
        assert_eq!(first.file_name().unwrap(), "custom_level_1.json");
        assert_eq!(second.file_name().unwrap(), "custom_level_2.json");

        let reloaded = Level::load(&first).unwrap();
        assert_eq!(reloaded.target, voxels);
        assert_eq!(reloaded.name, "Mine");
    }
}
