//! Death animation state and game-over classification
//!
//! On a fatal collision the simulation freezes and a short particle
//! explosion plays at the collision cell. When the last frame has run,
//! the score is bucketed and a flavor message is drawn for the game-over
//! screen.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::Cell;
use crate::consts::*;

/// What killed the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    SelfBite,
    Obstacle,
}

impl DeathCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::SelfBite => "bit yourself",
            DeathCause::Obstacle => "hit an obstacle",
        }
    }
}

/// Score bucket used to select a game-over message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreClass {
    Bad,
    Good,
    Excellent,
}

/// Bucket a final score
pub fn classify(score: u32) -> ScoreClass {
    if score <= 100 {
        ScoreClass::Bad
    } else if score <= 200 {
        ScoreClass::Good
    } else {
        ScoreClass::Excellent
    }
}

const SELF_BAD: &[&str] = &[
    "Did you taste good?",
    "How do you even bite yourself?",
    "Rookie.",
];
const OBSTACLE_BAD: &[&str] = &[
    "No apples in there.",
    "How did that even kill you?",
    "Rookie.",
];
const ANY_GOOD: &[&str] = &[
    "All snakes must die...",
    "A snake's life is short.",
    "Snake happens.",
    "You did well.",
];
const ANY_EXCELLENT: &[&str] = &[
    "Stuffed to bursting...",
    "Too many apples; have some snake for a change.",
    "UNBELIEVABLE!!!",
];

/// Message bucket for a (cause, class) pair
pub fn message_bucket(cause: DeathCause, class: ScoreClass) -> &'static [&'static str] {
    match (cause, class) {
        (DeathCause::SelfBite, ScoreClass::Bad) => SELF_BAD,
        (DeathCause::Obstacle, ScoreClass::Bad) => OBSTACLE_BAD,
        (_, ScoreClass::Good) => ANY_GOOD,
        (_, ScoreClass::Excellent) => ANY_EXCELLENT,
    }
}

/// Uniform pick from the bucket matching the cause and score
pub fn pick_message(cause: DeathCause, score: u32, rng: &mut Pcg32) -> &'static str {
    let bucket = message_bucket(cause, classify(score));
    bucket[rng.random_range(0..bucket.len())]
}

/// An explosion fragment (render-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub size: f32,
    pub alpha: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
}

/// Death animation state; created on collision, cleared on reset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeathState {
    pub cause: Option<DeathCause>,
    pub position: Option<Cell>,
    pub frame: u32,
    pub particles: Vec<Particle>,
}

impl DeathState {
    /// Record what killed the snake and where
    pub fn record(&mut self, cause: DeathCause, position: Cell) {
        self.cause = Some(cause);
        self.position = Some(position);
        self.frame = 0;
    }

    /// Build the particle burst at the dead snake's head, in pixel space
    pub fn spawn_particles(&mut self, head: Cell, cell_px: f32, rng: &mut Pcg32) {
        let center = Vec2::new(
            (head.x as f32 + 0.5) * cell_px,
            (head.y as f32 + 0.5) * cell_px,
        );
        self.particles = (0..DEATH_PARTICLES)
            .map(|_| Particle {
                pos: center,
                angle: rng.random::<f32>() * std::f32::consts::TAU,
                speed: PARTICLE_BASE_SPEED + rng.random::<f32>() * PARTICLE_SPEED_RANGE,
                size: cell_px * 0.2 + rng.random::<f32>() * cell_px * 0.8,
                alpha: 1.0,
                rotation: rng.random::<f32>() * std::f32::consts::TAU,
                rotation_speed: (rng.random::<f32>() - 0.5) * 0.2,
            })
            .collect();
    }

    /// Animation progress in [0, 1]
    pub fn progress(&self) -> f32 {
        self.frame as f32 / DEATH_ANIMATION_FRAMES as f32
    }

    /// Whether the animation is running
    pub fn is_animating(&self) -> bool {
        self.cause.is_some() && self.frame < DEATH_ANIMATION_FRAMES
    }

    /// Advance one animation frame. Returns true when the animation has
    /// just run its final frame.
    pub fn step(&mut self) -> bool {
        self.frame += 1;
        let progress = self.progress();
        for particle in &mut self.particles {
            particle.pos += Vec2::new(particle.angle.cos(), particle.angle.sin()) * particle.speed;
            particle.alpha = 1.0 - progress;
            particle.rotation += particle.rotation_speed;
            particle.speed *= PARTICLE_DAMPING;
        }
        self.frame >= DEATH_ANIMATION_FRAMES
    }

    /// Force-clear back to the alive state
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
