//! Level sequencing and starter code

use std::fs;
use std::path::PathBuf;

use lattice::{discover_levels, Level, ProgressStore};
use tracing::debug;

const DEFAULT_STARTER: &str = "-- rule(x, y, z) runs for every cell, x, y, z in -3..3.\n-- Return a color id 1..8 to place a voxel, 0 for empty.\nreturn 0\n";

/// The ordered level list and the current selection
pub struct LevelManager {
    levels: Vec<Level>,
    current: usize,
    examples_dir: PathBuf,
}

impl LevelManager {
    pub fn new(levels_dir: &std::path::Path) -> Self {
        Self {
            levels: discover_levels(levels_dir),
            current: 0,
            examples_dir: levels_dir.join("examples"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.levels.iter().map(|l| l.name.clone()).collect()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Level> {
        self.levels.get(self.current)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.id == id)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.levels.len() {
            self.current = index;
        }
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.levels.len()
    }

    /// Move to the next level, if any
    pub fn advance(&mut self) -> bool {
        if self.has_next() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Editor contents for the current level.
    ///
    /// A solved level reopens with its best code; otherwise the per-level
    /// example `levels/examples/<id>.lua` is used when present, and a
    /// generic template as the last resort.
    pub fn starter_code(&self, progress: &ProgressStore) -> String {
        let Some(level) = self.current() else {
            return DEFAULT_STARTER.to_string();
        };
        if let Some(entry) = progress.get(&level.id) {
            if entry.completed && !entry.best_code.is_empty() {
                return entry.best_code.clone();
            }
        }
        let example = self.examples_dir.join(format!("{}.lua", level.id));
        match fs::read_to_string(&example) {
            Ok(code) => code,
            Err(_) => {
                debug!("no starter example at {}", example.display());
                DEFAULT_STARTER.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_level(dir: &Path, file: &str, name: &str) {
        fs::write(
            dir.join(file),
            format!(r#"{{"name": "{name}", "blocks": []}}"#),
        )
        .unwrap();
    }

    #[test]
    fn test_sequencing() {
        let dir = tempfile::tempdir().unwrap();
        write_level(dir.path(), "a.json", "2 Second");
        write_level(dir.path(), "b.json", "1 First");

        let mut manager = LevelManager::new(dir.path());
        assert_eq!(manager.current().unwrap().name, "1 First");
        assert!(manager.has_next());
        assert!(manager.advance());
        assert_eq!(manager.current().unwrap().name, "2 Second");
        assert!(!manager.advance());
    }

    #[test]
    fn test_starter_prefers_best_code() {
        let dir = tempfile::tempdir().unwrap();
        write_level(dir.path(), "lvl.json", "1 Level");

        let manager = LevelManager::new(dir.path());
        let mut progress = ProgressStore::load(dir.path().join("progress.json"));
        assert_eq!(manager.starter_code(&progress), DEFAULT_STARTER);

        progress.record("lvl", 900, "return 3").unwrap();
        assert_eq!(manager.starter_code(&progress), "return 3");
    }

    #[test]
    fn test_starter_reads_example_file() {
        let dir = tempfile::tempdir().unwrap();
        write_level(dir.path(), "lvl.json", "1 Level");
        let examples = dir.path().join("examples");
        fs::create_dir(&examples).unwrap();
        fs::write(examples.join("lvl.lua"), "return 1\n").unwrap();

        let manager = LevelManager::new(dir.path());
        let progress = ProgressStore::load(dir.path().join("progress.json"));
        assert_eq!(manager.starter_code(&progress), "return 1\n");
    }

    #[test]
    fn test_select_out_of_range_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_level(dir.path(), "lvl.json", "1 Level");
        let mut manager = LevelManager::new(dir.path());
        manager.select(5);
        assert_eq!(manager.current_index(), 0);
    }
}
