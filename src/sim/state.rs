//! Game state and core simulation types
//!
//! Everything needed to resume or replay a run deterministically lives
//! here; render-only data (particles) is owned by the death state.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::death::{DeathCause, DeathState};
use super::grid::{Cell, Grid, Region};
use super::spawn::{self, Occupancy, SafeZone};
use crate::consts::*;
use crate::difficulty::DifficultyConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// No run in progress (menu)
    #[default]
    Stopped,
    /// Active gameplay
    Running,
    /// Frozen mid-run
    Paused,
    /// Death animation playing
    Dying,
    /// Run ended, summary available
    GameOver,
}

/// Movement direction; latched between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step in grid coordinates (y grows downward)
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// The transient 2x2 food; timing lives in the timer scheduler
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BigFoodState {
    pub region: Option<Region>,
    /// Toggled during the terminal blink phase
    pub visible: bool,
}

impl Default for BigFoodState {
    fn default() -> Self {
        Self {
            region: None,
            visible: true,
        }
    }
}

impl BigFoodState {
    pub fn is_active(&self) -> bool {
        self.region.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Game-over screen contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub cause: DeathCause,
    pub message: String,
    pub score: u32,
}

/// Things that happened during a dispatch, for the embedder to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    FoodEaten { at: Cell, score: u32 },
    BigFoodEaten { score: u32 },
    /// The food counter crossed a spawn threshold; a big food should spawn
    BigFoodDue,
    BigFoodSpawned { region: Region },
    BigFoodExpired,
    /// The tick interval changed; the tick timer must be rescheduled
    SpeedChanged { interval_ms: u64 },
    Collided { cause: DeathCause, at: Cell },
    GameOverShown { cause: DeathCause, score: u32, message: &'static str },
}

/// Complete simulation state for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub grid: Grid,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Body cells, head at the front
    pub snake: VecDeque<Cell>,
    pub direction: Direction,
    /// Always present except during regeneration
    pub food: Option<Cell>,
    pub big_food: BigFoodState,
    /// Fixed for the whole run
    pub obstacles: Vec<Cell>,
    pub score: u32,
    /// Normal foods eaten this run
    pub food_count: u32,
    /// Current tick interval (shrinks as food is eaten)
    pub interval_ms: u64,
    pub phase: GamePhase,
    pub death: DeathState,
    pub game_over: Option<GameOverSummary>,
}

impl GameState {
    /// Build a fresh run: snake at spawn, obstacles placed, food on the
    /// board, phase Running.
    pub fn new(grid: Grid, seed: u64, cfg: &DifficultyConfig) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let snake: VecDeque<Cell> = (0..INITIAL_SNAKE_LENGTH)
            .map(|i| Cell::new(SNAKE_SPAWN_X - i as i32, SNAKE_SPAWN_Y))
            .collect();

        let obstacles = spawn::spawn_obstacles(
            &mut rng,
            grid,
            cfg.obstacle_count,
            SafeZone::around_spawn(),
            &snake,
            None,
        );

        let occupancy = Occupancy {
            snake: &snake,
            obstacles: &obstacles,
        };
        let food = match spawn::spawn_food(&mut rng, grid, occupancy, None) {
            Ok(cell) => Some(cell),
            Err(err) => {
                log::warn!("initial food spawn failed: {err}; retrying next tick");
                None
            }
        };

        Self {
            grid,
            seed,
            rng,
            snake,
            direction: Direction::Right,
            food,
            big_food: BigFoodState::default(),
            obstacles,
            score: 0,
            food_count: 0,
            interval_ms: cfg.initial_interval_ms,
            phase: GamePhase::Running,
            death: DeathState::default(),
            game_over: None,
        }
    }

    pub fn head(&self) -> Cell {
        self.snake[0]
    }

    pub fn occupancy(&self) -> Occupancy<'_> {
        Occupancy {
            snake: &self.snake,
            obstacles: &self.obstacles,
        }
    }

    /// Apply a direction intent. A reversal of the current direction is
    /// dropped silently; anything else latches for the next tick.
    pub fn set_direction(&mut self, dir: Direction) -> bool {
        if dir == self.direction.opposite() {
            return false;
        }
        self.direction = dir;
        true
    }
}
