//! High score persistence
//!
//! One best score per difficulty. The game facade commits a score only
//! when it beats the stored one, so the persisted value never decreases
//! outside an explicit clear.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;

/// Storage collaborator, keyed by difficulty
pub trait HighScoreStore {
    fn get(&self, difficulty: Difficulty) -> u32;
    fn set(&mut self, difficulty: Difficulty, score: u32);
    fn clear(&mut self, difficulty: Difficulty);
}

/// The persisted table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub easy: u32,
    pub normal: u32,
    pub hard: u32,
}

impl ScoreTable {
    pub fn get(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
        }
    }

    pub fn set(&mut self, difficulty: Difficulty, score: u32) {
        match difficulty {
            Difficulty::Easy => self.easy = score,
            Difficulty::Normal => self.normal = score,
            Difficulty::Hard => self.hard = score,
        }
    }
}

/// In-memory store for tests and the demo driver
#[derive(Debug, Default)]
pub struct MemoryScores {
    table: ScoreTable,
}

impl MemoryScores {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HighScoreStore for MemoryScores {
    fn get(&self, difficulty: Difficulty) -> u32 {
        self.table.get(difficulty)
    }

    fn set(&mut self, difficulty: Difficulty, score: u32) {
        self.table.set(difficulty, score);
    }

    fn clear(&mut self, difficulty: Difficulty) {
        self.table.set(difficulty, 0);
    }
}

/// File-backed store: the whole table as one JSON blob
#[derive(Debug)]
pub struct JsonScores {
    path: PathBuf,
    table: ScoreTable,
}

impl JsonScores {
    /// Open a store at `path`, falling back to an empty table if the
    /// file is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let table = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(table) => {
                    log::info!("loaded high scores from {}", path.display());
                    table
                }
                Err(err) => {
                    log::warn!("corrupt high score file {}: {err}", path.display());
                    ScoreTable::default()
                }
            },
            Err(_) => {
                log::info!("no high score file at {}, starting fresh", path.display());
                ScoreTable::default()
            }
        };
        Self { path, table }
    }

    fn save(&self) {
        match serde_json::to_string(&self.table) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    log::warn!("failed to save high scores: {err}");
                } else {
                    log::info!("high scores saved");
                }
            }
            Err(err) => log::warn!("failed to serialize high scores: {err}"),
        }
    }
}

impl HighScoreStore for JsonScores {
    fn get(&self, difficulty: Difficulty) -> u32 {
        self.table.get(difficulty)
    }

    fn set(&mut self, difficulty: Difficulty, score: u32) {
        self.table.set(difficulty, score);
        self.save();
    }

    fn clear(&mut self, difficulty: Difficulty) {
        self.table.set(difficulty, 0);
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_keyed_by_difficulty() {
        let mut table = ScoreTable::default();
        table.set(Difficulty::Hard, 300);
        assert_eq!(table.get(Difficulty::Hard), 300);
        assert_eq!(table.get(Difficulty::Easy), 0);
        assert_eq!(table.get(Difficulty::Normal), 0);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryScores::new();
        assert_eq!(store.get(Difficulty::Normal), 0);
        store.set(Difficulty::Normal, 120);
        assert_eq!(store.get(Difficulty::Normal), 120);
        store.clear(Difficulty::Normal);
        assert_eq!(store.get(Difficulty::Normal), 0);
    }

    #[test]
    fn test_json_store_round_trip() {
        let path = std::env::temp_dir().join(format!("torus_snake_scores_{}.json", std::process::id()));
        {
            let mut store = JsonScores::open(&path);
            store.set(Difficulty::Easy, 90);
            store.set(Difficulty::Hard, 210);
        }
        let store = JsonScores::open(&path);
        assert_eq!(store.get(Difficulty::Easy), 90);
        assert_eq!(store.get(Difficulty::Hard), 210);
        assert_eq!(store.get(Difficulty::Normal), 0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_empty() {
        let path = std::env::temp_dir().join(format!("torus_snake_corrupt_{}.json", std::process::id()));
        fs::write(&path, "not json").unwrap();
        let store = JsonScores::open(&path);
        assert_eq!(store.get(Difficulty::Normal), 0);
        let _ = fs::remove_file(&path);
    }
}
