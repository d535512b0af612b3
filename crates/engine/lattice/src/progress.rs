//! Progress persistence: best score and code per level
//!
//! The file is a JSON map from level id to progress record, read once at
//! startup and rewritten wholesale whenever a new best is recorded. Missing
//! or corrupt files silently start empty.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::judge::CompletionOutcome;

/// Stored result for one level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelProgress {
    pub completed: bool,
    pub best_score: u32,
    pub best_code: String,
}

/// Progress file handle plus its in-memory contents
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    entries: HashMap<String, LevelProgress>,
}

impl ProgressStore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("corrupt progress file {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self { path, entries }
    }

    pub fn get(&self, level_id: &str) -> Option<&LevelProgress> {
        self.entries.get(level_id)
    }

    pub fn best_score(&self, level_id: &str) -> u32 {
        self.get(level_id).map(|p| p.best_score).unwrap_or(0)
    }

    pub fn is_completed(&self, level_id: &str) -> bool {
        self.get(level_id).map(|p| p.completed).unwrap_or(false)
    }

    /// Record a completion; the file is rewritten only on a new best
    pub fn record(&mut self, level_id: &str, score: u32, code: &str) -> Result<CompletionOutcome> {
        if score > self.best_score(level_id) {
            self.entries.insert(
                level_id.to_string(),
                LevelProgress {
                    completed: true,
                    best_score: score,
                    best_code: code.to_string(),
                },
            );
            self.save()?;
            Ok(CompletionOutcome::NewBest { score })
        } else {
            Ok(CompletionOutcome::Repeat { score })
        }
    }

    fn save(&self) -> Result<()> {
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}
