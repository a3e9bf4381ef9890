//! Torus Snake demo driver
//!
//! Headless autoplay session: a synthetic millisecond clock drives the
//! game while a greedy food-seeking pilot supplies direction intents,
//! until the run ends. Useful for exercising the whole engine from the
//! command line:
//!
//! ```text
//! torus-snake [seed] [easy|normal|hard]
//! ```

use torus_snake::highscores::MemoryScores;
use torus_snake::sim::{Cell, Direction, GamePhase};
use torus_snake::{Difficulty, Game};

/// Demo canvas, portrait phone proportions
const CANVAS_W: f32 = 360.0;
const CANVAS_H: f32 = 640.0;
/// Hard stop for the demo loop
const MAX_DEMO_MS: u64 = 10 * 60 * 1000;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    let difficulty = args
        .next()
        .and_then(|s| Difficulty::from_str(&s))
        .unwrap_or_default();

    let mut game = Game::with_canvas(CANVAS_W, CANVAS_H, seed, Box::new(MemoryScores::new()));
    game.set_difficulty(difficulty, 0);
    log::info!("autoplay: seed {seed}, difficulty {}", difficulty.as_str());

    let mut now = 0u64;
    while game.phase() != GamePhase::GameOver && now < MAX_DEMO_MS {
        now += 10;
        if let Some(dir) = steer(&game) {
            game.on_direction_intent(dir);
        }
        for event in game.advance_to(now) {
            log::info!("t={now}ms {event:?}");
        }
    }

    match game.game_over() {
        Some(summary) => println!(
            "{} after {:.1}s: \"{}\" (score {}, best {})",
            summary.cause.as_str(),
            now as f32 / 1000.0,
            summary.message,
            summary.score,
            game.high_score(),
        ),
        None => println!(
            "still alive after {:.0}s with score {}",
            now as f32 / 1000.0,
            game.score()
        ),
    }
}

/// Greedy pilot: head for the big food if one is up, else the food,
/// never stepping straight into something solid.
fn steer(game: &Game) -> Option<Direction> {
    let state = game.state();
    if state.phase != GamePhase::Running {
        return None;
    }
    let head = state.head();
    let target = state.big_food.region.map(|r| r.origin).or(state.food)?;

    let mut order = Vec::with_capacity(4);
    let dx = target.x - head.x;
    let dy = target.y - head.y;
    let horizontal = if dx > 0 { Direction::Right } else { Direction::Left };
    let vertical = if dy > 0 { Direction::Down } else { Direction::Up };
    if dx.abs() >= dy.abs() {
        order.extend([horizontal, vertical]);
    } else {
        order.extend([vertical, horizontal]);
    }
    // Fallbacks so the pilot can dodge even when the target is blocked
    order.extend([Direction::Up, Direction::Down, Direction::Left, Direction::Right]);

    order.into_iter().find(|dir| {
        if *dir == state.direction.opposite() {
            return false;
        }
        let (sx, sy) = dir.delta();
        let next = state.grid.wrap(Cell::new(head.x + sx, head.y + sy));
        !state.obstacles.contains(&next) && !state.snake.contains(&next)
    })
}
