//! Game facade
//!
//! Owns the simulation state, the timer scheduler and the persistence
//! collaborator, and turns timer firings into state transitions. The
//! embedder supplies a monotonic millisecond clock to `advance_to`,
//! pushes direction intents and control commands in, and reads a
//! [`RenderView`] out; nothing else mutates the simulation.

use std::collections::VecDeque;

use crate::clock::{TimerKind, Timers};
use crate::consts::*;
use crate::difficulty::Difficulty;
use crate::highscores::HighScoreStore;
use crate::sim::{
    self, Cell, DeathCause, Direction, GameEvent, GameOverSummary, GamePhase, GameState, Grid,
    Particle, Region,
};

/// Everything the renderer needs for one frame; read-only
#[derive(Debug)]
pub struct RenderView<'a> {
    pub snake: &'a VecDeque<Cell>,
    pub food: Option<Cell>,
    pub big_food: Option<Region>,
    pub big_food_visible: bool,
    pub obstacles: &'a [Cell],
    pub particles: &'a [Particle],
    pub death_progress: f32,
    /// Snake/food fade during the death animation (1.0 while alive)
    pub fade_alpha: f32,
    pub paused: bool,
    pub score: u32,
}

/// The assembled game: simulation + timers + collaborators
pub struct Game {
    state: GameState,
    timers: Timers,
    difficulty: Difficulty,
    scores: Box<dyn HighScoreStore>,
    grid: Grid,
    cell_px: f32,
    seed: u64,
    runs: u64,
}

impl Game {
    /// Explicit construction with all collaborators; no ambient globals.
    pub fn new(grid: Grid, cell_px: f32, seed: u64, scores: Box<dyn HighScoreStore>) -> Self {
        let difficulty = Difficulty::default();
        let mut state = GameState::new(grid, seed, difficulty.config());
        state.phase = GamePhase::Stopped;
        Self {
            state,
            timers: Timers::new(),
            difficulty,
            scores,
            grid,
            cell_px,
            seed,
            runs: 0,
        }
    }

    /// Construction from canvas dimensions; cells are sized so the
    /// board is [`crate::consts::TARGET_COLUMNS`] columns wide
    pub fn with_canvas(
        width_px: f32,
        height_px: f32,
        seed: u64,
        scores: Box<dyn HighScoreStore>,
    ) -> Self {
        let cell_px = crate::cell_px_for_width(width_px);
        let grid = Grid::from_canvas(width_px, height_px, cell_px);
        Self::new(grid, cell_px, seed, scores)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn high_score(&self) -> u32 {
        self.scores.get(self.difficulty)
    }

    pub fn clear_high_score(&mut self, difficulty: Difficulty) {
        self.scores.clear(difficulty);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn game_over(&self) -> Option<&GameOverSummary> {
        self.state.game_over.as_ref()
    }

    /// Select a difficulty and begin a fresh run
    pub fn set_difficulty(&mut self, difficulty: Difficulty, now_ms: u64) {
        self.difficulty = difficulty;
        log::info!("difficulty set to {}", difficulty.as_str());
        self.start(now_ms);
    }

    /// Begin a fresh run with the current difficulty
    pub fn restart(&mut self, now_ms: u64) {
        self.start(now_ms);
    }

    fn start(&mut self, now_ms: u64) {
        self.timers.cancel_all();
        self.runs += 1;
        let run_seed = self.seed.wrapping_add(self.runs);
        self.state = GameState::new(self.grid, run_seed, self.difficulty.config());
        // Cannot fail: all timers were just cancelled
        let _ = self
            .timers
            .schedule_repeating(TimerKind::SimTick, now_ms, self.state.interval_ms);
        log::info!(
            "run started: seed {run_seed}, {} obstacles, tick {}ms",
            self.state.obstacles.len(),
            self.state.interval_ms
        );
    }

    /// Freeze the run. Input is rejected until resume.
    pub fn pause(&mut self, now_ms: u64) {
        if self.state.phase == GamePhase::Running {
            self.state.phase = GamePhase::Paused;
            self.timers.pause(now_ms);
            log::info!("paused");
        }
    }

    pub fn resume(&mut self, now_ms: u64) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Running;
            self.timers.resume(now_ms);
            log::info!("resumed");
        }
    }

    /// Abandon the run and return to the stopped state
    pub fn exit(&mut self) {
        self.timers.cancel_all();
        self.state.phase = GamePhase::Stopped;
        self.state.death.clear();
        self.state.big_food.clear();
        self.state.game_over = None;
        log::info!("exited to menu");
    }

    /// A direction intent from the input collaborator. Ignored unless a
    /// run is active; a reversal of the current direction is dropped.
    pub fn on_direction_intent(&mut self, dir: Direction) {
        if self.state.phase != GamePhase::Running {
            return;
        }
        if !self.state.set_direction(dir) {
            log::debug!("direction reversal ignored");
        }
    }

    /// Poll timers up to `now_ms` and run everything that came due.
    /// Returns the gameplay events produced, in order.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<GameEvent> {
        let mut out = Vec::new();
        for kind in self.timers.poll(now_ms) {
            self.dispatch(kind, now_ms, &mut out);
        }
        out
    }

    fn dispatch(&mut self, kind: TimerKind, now_ms: u64, out: &mut Vec<GameEvent>) {
        match kind {
            TimerKind::SimTick => {
                for event in sim::advance(&mut self.state, self.difficulty.config()) {
                    self.react(event, now_ms, out);
                }
            }
            TimerKind::BigFoodExpiry => {
                out.push(sim::food::on_expired(&mut self.state, &mut self.timers));
            }
            TimerKind::BigFoodBlinkStart => sim::food::on_blink_start(&mut self.timers, now_ms),
            TimerKind::BigFoodBlink => sim::food::on_blink(&mut self.state),
            TimerKind::DeathFrame => self.on_death_frame(out),
        }
    }

    fn react(&mut self, event: GameEvent, now_ms: u64, out: &mut Vec<GameEvent>) {
        match event {
            GameEvent::SpeedChanged { interval_ms } => {
                self.timers
                    .restart_repeating(TimerKind::SimTick, now_ms, interval_ms);
                log::debug!("tick interval now {interval_ms}ms");
            }
            GameEvent::BigFoodEaten { .. } => {
                // The sim already cleared the region; tear down its timers
                sim::food::cancel_timers(&mut self.timers);
            }
            GameEvent::BigFoodDue => {
                let duration = self.difficulty.config().big_food_duration_ms;
                match sim::food::spawn(&mut self.state, &mut self.timers, now_ms, duration) {
                    Ok(spawned) => out.push(spawned),
                    Err(err) => log::warn!("big food spawn failed: {err}"),
                }
                // The request itself is not surfaced
                return;
            }
            GameEvent::Collided { cause, at } => {
                self.enter_death(cause, at, now_ms);
            }
            _ => {}
        }
        out.push(event);
    }

    /// Fatal collision: stop the tick driver, commit the score, start
    /// the death animation. The tick timer is cancelled before the
    /// animation timer is scheduled; the two never run together.
    fn enter_death(&mut self, cause: DeathCause, at: Cell, now_ms: u64) {
        self.timers.cancel(TimerKind::SimTick);

        let score = self.state.score;
        if score > self.scores.get(self.difficulty) {
            log::info!("new {} high score: {score}", self.difficulty.as_str());
            self.scores.set(self.difficulty, score);
        }

        let head = self.state.head();
        let state = &mut self.state;
        state.death.spawn_particles(head, self.cell_px, &mut state.rng);

        // Cannot fail: DeathFrame is only ever scheduled here, after a kill
        let _ = self
            .timers
            .schedule_repeating(TimerKind::DeathFrame, now_ms, DEATH_FRAME_MS);
        log::info!("death by {cause:?} at {at:?}, score {score}");
    }

    fn on_death_frame(&mut self, out: &mut Vec<GameEvent>) {
        if self.state.phase != GamePhase::Dying {
            return;
        }
        if self.state.death.step() {
            self.timers.cancel(TimerKind::DeathFrame);
            let Some(cause) = self.state.death.cause else {
                return;
            };
            let score = self.state.score;
            let message = sim::pick_message(cause, score, &mut self.state.rng);
            self.state.phase = GamePhase::GameOver;
            self.state.game_over = Some(GameOverSummary {
                cause,
                message: message.to_owned(),
                score,
            });
            out.push(GameEvent::GameOverShown {
                cause,
                score,
                message,
            });
            log::info!("game over: {} - {message}", cause.as_str());
        }
    }

    /// Snapshot for the renderer
    pub fn render_view(&self) -> RenderView<'_> {
        let dying = self.state.phase == GamePhase::Dying;
        let progress = if dying { self.state.death.progress() } else { 0.0 };
        RenderView {
            snake: &self.state.snake,
            food: self.state.food,
            big_food: self.state.big_food.region,
            big_food_visible: self.state.big_food.visible,
            obstacles: &self.state.obstacles,
            particles: &self.state.death.particles,
            death_progress: progress,
            fade_alpha: 1.0 - progress,
            paused: self.state.phase == GamePhase::Paused,
            score: self.state.score,
        }
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryScores;

    fn game() -> Game {
        Game::new(Grid::new(20, 35), 18.0, 0xC0FFEE, Box::new(MemoryScores::new()))
    }

    fn interval(game: &Game) -> u64 {
        game.state().interval_ms
    }

    #[test]
    fn test_starts_stopped_until_difficulty_selected() {
        let mut game = game();
        assert_eq!(game.phase(), GamePhase::Stopped);
        assert!(game.advance_to(10_000).is_empty());

        game.set_difficulty(Difficulty::Easy, 0);
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn test_ticks_move_the_snake() {
        let mut game = game();
        game.set_difficulty(Difficulty::Normal, 0);
        game.state_mut().obstacles.clear();
        game.state_mut().food = Some(Cell::new(15, 30));

        let head = game.state().head();
        game.advance_to(interval(&game) * 3);
        let moved = game.state().head();
        assert_eq!(moved, Cell::new(head.x + 3, head.y));
    }

    #[test]
    fn test_pause_freezes_and_rejects_input() {
        let mut game = game();
        game.set_difficulty(Difficulty::Normal, 0);
        game.state_mut().obstacles.clear();
        game.state_mut().food = Some(Cell::new(15, 30));

        game.pause(50);
        assert_eq!(game.phase(), GamePhase::Paused);
        assert!(game.render_view().paused);

        let head = game.state().head();
        let dir = game.state().direction;
        game.on_direction_intent(Direction::Up);
        assert_eq!(game.state().direction, dir);
        assert!(game.advance_to(10_000).is_empty());
        assert_eq!(game.state().head(), head);

        // Resume at t=10050: the paused span shifts the schedule
        game.resume(10_050);
        game.advance_to(10_050 + interval(&game));
        assert_eq!(game.state().head(), Cell::new(head.x + 1, head.y));
    }

    #[test]
    fn test_reversal_ignored_through_facade() {
        let mut game = game();
        game.set_difficulty(Difficulty::Normal, 0);
        assert_eq!(game.state().direction, Direction::Right);
        game.on_direction_intent(Direction::Left);
        assert_eq!(game.state().direction, Direction::Right);
        game.on_direction_intent(Direction::Down);
        assert_eq!(game.state().direction, Direction::Down);
    }

    #[test]
    fn test_death_runs_animation_then_game_over() {
        let mut game = game();
        game.set_difficulty(Difficulty::Normal, 0);
        let head = game.state().head();
        game.state_mut().obstacles = vec![Cell::new(head.x + 1, head.y)];
        game.state_mut().score = 42;

        let tick = interval(&game);
        let events = game.advance_to(tick);
        assert_eq!(game.phase(), GamePhase::Dying);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Collided { .. })));
        assert!(!game.state().death.particles.is_empty());

        // High score committed at the moment of death
        assert_eq!(game.high_score(), 42);

        // Exactly DEATH_ANIMATION_FRAMES frames, then one GameOverShown
        let mut shown = 0;
        let mut now = tick;
        for _ in 0..DEATH_ANIMATION_FRAMES + 5 {
            now += DEATH_FRAME_MS;
            for event in game.advance_to(now) {
                if matches!(event, GameEvent::GameOverShown { .. }) {
                    shown += 1;
                }
            }
        }
        assert_eq!(shown, 1);
        assert_eq!(game.phase(), GamePhase::GameOver);
        let summary = game.game_over().expect("summary");
        assert_eq!(summary.score, 42);
        assert_eq!(summary.cause, DeathCause::Obstacle);
        assert!(!summary.message.is_empty());
    }

    #[test]
    fn test_high_score_never_decreases() {
        let mut game = game();
        game.set_difficulty(Difficulty::Normal, 0);
        let head = game.state().head();
        game.state_mut().obstacles = vec![Cell::new(head.x + 1, head.y)];
        game.state_mut().score = 100;
        game.advance_to(interval(&game));
        assert_eq!(game.high_score(), 100);

        // A worse run must not lower it
        game.restart(1_000_000);
        let head = game.state().head();
        game.state_mut().obstacles = vec![Cell::new(head.x + 1, head.y)];
        game.state_mut().score = 30;
        game.advance_to(1_000_000 + interval(&game));
        assert_eq!(game.high_score(), 100);

        game.clear_high_score(Difficulty::Normal);
        assert_eq!(game.high_score(), 0);
    }

    #[test]
    fn test_restart_clears_death_state() {
        let mut game = game();
        game.set_difficulty(Difficulty::Normal, 0);
        let head = game.state().head();
        game.state_mut().obstacles = vec![Cell::new(head.x + 1, head.y)];
        game.advance_to(interval(&game));
        assert_eq!(game.phase(), GamePhase::Dying);

        game.restart(5_000);
        assert_eq!(game.phase(), GamePhase::Running);
        assert!(game.state().death.cause.is_none());
        assert!(game.state().death.particles.is_empty());
        assert!(game.game_over().is_none());

        // Old death frames never fire
        let events = game.advance_to(5_000 + interval(&game));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::GameOverShown { .. })));
    }

    #[test]
    fn test_exit_silences_everything() {
        let mut game = game();
        game.set_difficulty(Difficulty::Normal, 0);
        game.exit();
        assert_eq!(game.phase(), GamePhase::Stopped);
        assert!(game.advance_to(1_000_000).is_empty());
    }

    #[test]
    fn test_big_food_spawns_after_ten_foods() {
        let mut game = game();
        game.set_difficulty(Difficulty::Normal, 0);
        game.state_mut().obstacles.clear();
        game.state_mut().food_count = 9;
        // Park the food right in front of the head
        let head = game.state().head();
        game.state_mut().food = Some(Cell::new(head.x + 1, head.y));

        let events = game.advance_to(interval(&game));
        assert!(events.iter().any(|e| matches!(e, GameEvent::BigFoodSpawned { .. })));
        assert!(game.state().big_food.is_active());
        assert!(game.render_view().big_food.is_some());
    }
}
