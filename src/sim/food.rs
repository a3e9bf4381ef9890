//! Big food lifecycle: spawn, blink warning, expiry
//!
//! The 2x2 food lives through three timed phases: visible-solid,
//! blinking, gone. All timing goes through the timer scheduler so that
//! every transition (spawn, consumption, expiry, reset) can cancel the
//! pending timers of the previous phase; no callback ever acts on a
//! cleared food.

use super::spawn::{self, Occupancy, SpawnError};
use super::state::{GameEvent, GameState};
use crate::clock::{TimerKind, Timers};
use crate::consts::*;

/// Cancel every pending big-food timer
pub fn cancel_timers(timers: &mut Timers) {
    timers.cancel(TimerKind::BigFoodExpiry);
    timers.cancel(TimerKind::BigFoodBlinkStart);
    timers.cancel(TimerKind::BigFoodBlink);
}

/// Spawn a big food and arm its expiry and blink-start timers.
///
/// Any previous big food and its timers are torn down first.
pub fn spawn(
    state: &mut GameState,
    timers: &mut Timers,
    now_ms: u64,
    duration_ms: u64,
) -> Result<GameEvent, SpawnError> {
    cancel_timers(timers);
    state.big_food.clear();

    let occupancy = Occupancy {
        snake: &state.snake,
        obstacles: &state.obstacles,
    };
    let region = spawn::spawn_big_food(&mut state.rng, state.grid, occupancy)?;
    state.big_food.region = Some(region);
    state.big_food.visible = true;

    // Cannot fail: both kinds were cancelled above
    let _ = timers.schedule_once(TimerKind::BigFoodExpiry, now_ms, duration_ms);
    let blink_at = duration_ms.saturating_sub(BIG_FOOD_BLINK_LEAD_MS);
    let _ = timers.schedule_once(TimerKind::BigFoodBlinkStart, now_ms, blink_at);

    log::info!("big food spawned at {:?} for {duration_ms}ms", region.origin);
    Ok(GameEvent::BigFoodSpawned { region })
}

/// Remove the big food and cancel all of its timers
pub fn remove(state: &mut GameState, timers: &mut Timers) {
    cancel_timers(timers);
    state.big_food.clear();
}

/// Enter the blink phase: start the repeating visibility toggle
pub fn on_blink_start(timers: &mut Timers, now_ms: u64) {
    let _ = timers.schedule_repeating(TimerKind::BigFoodBlink, now_ms, BIG_FOOD_BLINK_PERIOD_MS);
}

/// One blink: toggle visibility. A toggle delivered in the same poll
/// batch as the expiry must not act on the cleared food.
pub fn on_blink(state: &mut GameState) {
    if state.big_food.is_active() {
        state.big_food.visible = !state.big_food.visible;
    }
}

/// The lifetime ran out
pub fn on_expired(state: &mut GameState, timers: &mut Timers) -> GameEvent {
    log::info!("big food expired");
    remove(state, timers);
    GameEvent::BigFoodExpired
}
