//! Fixed-timestep simulation tick
//!
//! One call to [`advance`] moves the snake exactly one cell and settles
//! everything that follows from it: wrapping, collisions, eating, growth
//! and the speed ramp. Timing lives with the caller; this module is pure
//! state transformation.

use super::death::DeathCause;
use super::grid::Cell;
use super::spawn::{self, Occupancy};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::difficulty::DifficultyConfig;

/// Advance the simulation by one tick.
///
/// Returns the events produced this tick; the caller reacts to them
/// (rescheduling timers, spawning big food, starting the death
/// animation). Does nothing unless the game is running.
pub fn advance(state: &mut GameState, cfg: &DifficultyConfig) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }

    // A failed respawn last tick leaves the board foodless; retry first
    if state.food.is_none() {
        respawn_food(state);
    }

    let (dx, dy) = state.direction.delta();
    let head = state.head();
    let new_head = state.grid.wrap(Cell::new(head.x + dx, head.y + dy));

    // Obstacles first, then own body; first match wins
    if let Some(cause) = collision_cause(state, new_head) {
        state.death.record(cause, new_head);
        state.phase = GamePhase::Dying;
        events.push(GameEvent::Collided {
            cause,
            at: new_head,
        });
        log::debug!("collision: {cause:?} at {new_head:?}");
        return events;
    }

    state.snake.push_front(new_head);
    let mut ate = false;

    // Big food: head anywhere inside the 2x2 region counts
    if let Some(region) = state.big_food.region
        && region.contains(new_head)
    {
        state.score += BIG_FOOD_SCORE;
        state.big_food.clear();
        events.push(GameEvent::BigFoodEaten {
            score: BIG_FOOD_SCORE,
        });
        ate = true;
    }

    // Normal food: exact cell match. Checked independently of big food;
    // both can land in one tick and both scores apply.
    if state.food == Some(new_head) {
        state.score += cfg.score_per_food;
        state.food_count += 1;
        events.push(GameEvent::FoodEaten {
            at: new_head,
            score: cfg.score_per_food,
        });

        let next = cfg.ramp(state.interval_ms);
        if next != state.interval_ms {
            state.interval_ms = next;
            events.push(GameEvent::SpeedChanged { interval_ms: next });
        }

        state.food = None;
        respawn_food(state);

        if state.food_count % BIG_FOOD_SPAWN_INTERVAL == 0 && !state.big_food.is_active() {
            events.push(GameEvent::BigFoodDue);
        }
        ate = true;
    }

    if !ate {
        state.snake.pop_back();
    }

    events
}

fn collision_cause(state: &GameState, new_head: Cell) -> Option<DeathCause> {
    if state.obstacles.contains(&new_head) {
        return Some(DeathCause::Obstacle);
    }
    // The current head slot is skipped; the neck and tail count even
    // though the tail would move away this tick
    if state.snake.iter().skip(1).any(|&seg| seg == new_head) {
        return Some(DeathCause::SelfBite);
    }
    None
}

fn respawn_food(state: &mut GameState) {
    let occupancy = Occupancy {
        snake: &state.snake,
        obstacles: &state.obstacles,
    };
    match spawn::spawn_food(&mut state.rng, state.grid, occupancy, state.big_food.region) {
        Ok(cell) => state.food = Some(cell),
        Err(err) => {
            log::warn!("food respawn failed: {err}; retrying next tick");
        }
    }
}
