//! Entity spawning: food, big food and obstacle placement
//!
//! All placement is rejection sampling over the grid with a hard attempt
//! cap. The grid is never anywhere near full in normal play, so the cap
//! only matters for degenerate states; hitting it surfaces as
//! [`SpawnError::Exhausted`] instead of a hung loop.

use std::collections::VecDeque;

use rand::Rng;
use rand_pcg::Pcg32;
use thiserror::Error;

use super::grid::{Cell, Grid, Region};
use crate::consts::*;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    /// No free position found within the attempt budget
    #[error("no free cell found after {0} attempts")]
    Exhausted(u32),
}

/// Read-only view of the cells something already sits on
#[derive(Debug, Clone, Copy)]
pub struct Occupancy<'a> {
    pub snake: &'a VecDeque<Cell>,
    pub obstacles: &'a [Cell],
}

impl Occupancy<'_> {
    pub fn contains(&self, cell: Cell) -> bool {
        self.snake.contains(&cell) || self.obstacles.contains(&cell)
    }
}

/// Obstacle-free rectangle around the snake spawn (inclusive bounds)
#[derive(Debug, Clone, Copy)]
pub struct SafeZone {
    pub min: Cell,
    pub max: Cell,
}

impl SafeZone {
    /// The zone covering the initial snake position
    pub fn around_spawn() -> Self {
        Self {
            min: Cell::new(SAFE_ZONE_MIN_X, SAFE_ZONE_MIN_Y),
            max: Cell::new(SAFE_ZONE_MAX_X, SAFE_ZONE_MAX_Y),
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.min.x && cell.x <= self.max.x && cell.y >= self.min.y && cell.y <= self.max.y
    }
}

fn random_cell(rng: &mut Pcg32, grid: Grid) -> Cell {
    Cell::new(
        rng.random_range(0..grid.cols),
        rng.random_range(0..grid.rows),
    )
}

/// Place a normal food on a free cell outside the big-food region
pub fn spawn_food(
    rng: &mut Pcg32,
    grid: Grid,
    occupancy: Occupancy<'_>,
    big_food: Option<Region>,
) -> Result<Cell, SpawnError> {
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let candidate = random_cell(rng, grid);
        if occupancy.contains(candidate) {
            continue;
        }
        if big_food.is_some_and(|region| region.contains(candidate)) {
            continue;
        }
        return Ok(candidate);
    }
    Err(SpawnError::Exhausted(MAX_SPAWN_ATTEMPTS))
}

/// Place a 2x2 big food; all four cells must be free
pub fn spawn_big_food(
    rng: &mut Pcg32,
    grid: Grid,
    occupancy: Occupancy<'_>,
) -> Result<Region, SpawnError> {
    // Origin range keeps the whole block on the grid
    let origin_grid = Grid::new(grid.cols - 1, grid.rows - 1);
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let candidate = Region::new(random_cell(rng, origin_grid));
        if candidate.cells().any(|cell| occupancy.contains(cell)) {
            continue;
        }
        return Ok(candidate);
    }
    Err(SpawnError::Exhausted(MAX_SPAWN_ATTEMPTS))
}

/// Place `count` obstacles one at a time.
///
/// Each placement is validated against the snake, the obstacles placed so
/// far, the spawn safe zone, a minimum Chebyshev gap between obstacles,
/// and any active big-food region; placement order feeding the next
/// check is intentional. If a placement exhausts its budget the set is
/// returned short rather than failing the game.
pub fn spawn_obstacles(
    rng: &mut Pcg32,
    grid: Grid,
    count: u32,
    safe_zone: SafeZone,
    snake: &VecDeque<Cell>,
    big_food: Option<Region>,
) -> Vec<Cell> {
    let mut obstacles: Vec<Cell> = Vec::with_capacity(count as usize);
    'placing: for _ in 0..count {
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let candidate = random_cell(rng, grid);
            let occupancy = Occupancy {
                snake,
                obstacles: &obstacles,
            };
            if occupancy.contains(candidate)
                || safe_zone.contains(candidate)
                || too_close(&obstacles, candidate)
                || big_food.is_some_and(|region| region.contains(candidate))
            {
                continue;
            }
            obstacles.push(candidate);
            continue 'placing;
        }
        log::warn!(
            "obstacle placement exhausted after {} of {count}; continuing short",
            obstacles.len()
        );
        break;
    }
    obstacles
}

fn too_close(obstacles: &[Cell], candidate: Cell) -> bool {
    obstacles.iter().any(|obs| {
        (obs.x - candidate.x).abs() < OBSTACLE_MIN_GAP && (obs.y - candidate.y).abs() < OBSTACLE_MIN_GAP
    })
}
