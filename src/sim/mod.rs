//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One cell step per tick, timing owned by the caller
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod death;
pub mod food;
pub mod grid;
pub mod spawn;
pub mod state;
pub mod tick;

pub use death::{DeathCause, DeathState, Particle, ScoreClass, classify, pick_message};
pub use grid::{Cell, Grid, Region};
pub use spawn::{Occupancy, SafeZone, SpawnError};
pub use state::{
    BigFoodState, Direction, GameEvent, GameOverSummary, GamePhase, GameState,
};
pub use tick::advance;
