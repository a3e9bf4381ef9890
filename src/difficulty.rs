//! Difficulty presets and game balance
//!
//! One configuration record per difficulty; no separate code paths.

use serde::{Deserialize, Serialize};

/// Selectable difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Balance record for this difficulty
    pub fn config(&self) -> &'static DifficultyConfig {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Normal => &NORMAL,
            Difficulty::Hard => &HARD,
        }
    }
}

/// Tuning knobs selected by difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Tick interval at game start
    pub initial_interval_ms: u64,
    /// Speed floor; the ramp never goes below this
    pub min_interval_ms: u64,
    /// Interval reduction per normal food eaten
    pub interval_step_ms: u64,
    /// Points per normal food
    pub score_per_food: u32,
    /// Obstacles generated per game
    pub obstacle_count: u32,
    /// Big food lifetime
    pub big_food_duration_ms: u64,
}

impl DifficultyConfig {
    /// Next tick interval after eating a normal food
    pub fn ramp(&self, interval_ms: u64) -> u64 {
        interval_ms
            .saturating_sub(self.interval_step_ms)
            .max(self.min_interval_ms)
    }
}

pub const EASY: DifficultyConfig = DifficultyConfig {
    initial_interval_ms: 200,
    min_interval_ms: 100,
    interval_step_ms: 5,
    score_per_food: 10,
    obstacle_count: 3,
    big_food_duration_ms: 10_000,
};

pub const NORMAL: DifficultyConfig = DifficultyConfig {
    initial_interval_ms: 150,
    min_interval_ms: 70,
    interval_step_ms: 8,
    score_per_food: 15,
    obstacle_count: 5,
    big_food_duration_ms: 8_000,
};

pub const HARD: DifficultyConfig = DifficultyConfig {
    initial_interval_ms: 120,
    min_interval_ms: 50,
    interval_step_ms: 10,
    score_per_food: 20,
    obstacle_count: 7,
    big_food_duration_ms: 5_000,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("impossible"), None);
    }

    #[test]
    fn test_ramp_respects_floor() {
        let cfg = Difficulty::Hard.config();
        let mut interval = cfg.initial_interval_ms;
        for _ in 0..100 {
            interval = cfg.ramp(interval);
        }
        assert_eq!(interval, cfg.min_interval_ms);
    }

    #[test]
    fn test_harder_means_faster_and_denser() {
        assert!(EASY.initial_interval_ms > NORMAL.initial_interval_ms);
        assert!(NORMAL.initial_interval_ms > HARD.initial_interval_ms);
        assert!(EASY.obstacle_count < HARD.obstacle_count);
        assert!(EASY.big_food_duration_ms > HARD.big_food_duration_ms);
    }
}
