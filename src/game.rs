//! Game lifecycle
//!
//! `Start -> Playing -> GameOver -> Playing -> ...`
//!
//! [`Game`] owns the simulation state, its context, the input table and the
//! high score store. The platform driver calls [`Game::start`] on the start or
//! restart action and [`Game::frame`] once per display refresh, rescheduling
//! only while the returned [`LoopControl`] says to continue.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::platform::InputTracker;
use crate::sim::{
    GamePhase, GameState, PlayArea, SimulationContext, TickOutcome, autopilot_input,
    start_round, tick,
};
use crate::tuning::Tuning;
use crate::ui::GameView;

/// Whether the frame loop should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Result of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub control: LoopControl,
    pub outcome: TickOutcome,
    /// This frame ended the run with a new high score
    pub new_record: bool,
}

/// A game session and everything it persists
pub struct Game<S: KeyValueStore> {
    state: GameState,
    ctx: SimulationContext,
    tuning: Tuning,
    high_score: HighScore,
    store: S,
    input: InputTracker,
    rng: Pcg32,
    autopilot: bool,
}

impl<S: KeyValueStore> Game<S> {
    /// New session on the start screen with an OS-seeded RNG
    pub fn new(tuning: Tuning, store: S) -> Self {
        Self::with_rng(tuning, store, Pcg32::from_os_rng())
    }

    /// New session with a caller-supplied RNG
    pub fn with_rng(tuning: Tuning, store: S, rng: Pcg32) -> Self {
        let high_score = HighScore::load(&store);
        Self {
            state: GameState::new(tuning.player_size),
            ctx: SimulationContext::new(&tuning, 0.0),
            tuning,
            high_score,
            store,
            input: InputTracker::new(),
            rng,
            autopilot: false,
        }
    }

    /// Start (or restart) a run; ignored while one is already in progress
    pub fn start(&mut self, now_ms: f64, area: PlayArea) -> bool {
        let from = self.state.phase;
        if from == GamePhase::Playing {
            log::warn!("Start requested while already playing, ignoring");
            return false;
        }
        start_round(&mut self.state, &mut self.ctx, &self.tuning, area, now_ms);
        match from {
            GamePhase::Start => log::info!("Game started"),
            _ => log::info!("Game restarted"),
        }
        true
    }

    /// Run one frame of the simulation
    pub fn frame(&mut self, timestamp_ms: f64, area: PlayArea) -> FrameReport {
        if self.state.phase != GamePhase::Playing {
            return FrameReport {
                control: LoopControl::Stop,
                outcome: TickOutcome {
                    skipped: true,
                    ..TickOutcome::default()
                },
                new_record: false,
            };
        }

        let input = if self.autopilot {
            autopilot_input(&self.state, area, self.tuning.player_speed)
        } else {
            self.input.tick_input()
        };
        let outcome = tick(
            &mut self.state,
            &mut self.ctx,
            &self.tuning,
            input,
            area,
            timestamp_ms,
            &mut self.rng,
        );

        if outcome.enemy_hit.is_some() {
            let new_record = self.game_over();
            return FrameReport {
                control: LoopControl::Stop,
                outcome,
                new_record,
            };
        }

        FrameReport {
            control: LoopControl::Continue,
            outcome,
            new_record: false,
        }
    }

    /// Playing -> GameOver bookkeeping; returns `true` on a new record
    fn game_over(&mut self) -> bool {
        let score = self.state.score;
        log::info!(
            "Game over with score {} after {:.1}s",
            score,
            self.ctx.game_time_ms / 1000.0
        );
        self.high_score.record(score, &mut self.store)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn input_mut(&mut self) -> &mut InputTracker {
        &mut self.input
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    /// Snapshot for the renderer
    pub fn view(&self) -> GameView {
        GameView::new(&self.state, self.high_score.best(), self.tuning.object_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HIGH_SCORE_KEY;
    use crate::persistence::MemoryStore;
    use crate::sim::{FallingObject, ObjectKind};
    use glam::Vec2;

    fn area() -> PlayArea {
        PlayArea::new(400.0, 300.0)
    }

    fn game(store: MemoryStore) -> Game<MemoryStore> {
        Game::with_rng(Tuning::default(), store, Pcg32::seed_from_u64(7))
    }

    fn drop_on_player(game: &mut Game<MemoryStore>, kind: ObjectKind) {
        let pos = game.state.player.pos;
        let id = game.state.next_object_id();
        game.state.objects.push(FallingObject {
            id,
            kind,
            pos: Vec2::new(pos.x, pos.y - 10.0),
            size: 36.0,
            spawned_at_ms: 0.0,
        });
    }

    #[test]
    fn test_full_lifecycle() {
        let mut game = game(MemoryStore::new());
        assert_eq!(game.phase(), GamePhase::Start);
        assert_eq!(game.frame(0.0, area()).control, LoopControl::Stop);

        assert!(game.start(1000.0, area()));
        assert_eq!(game.phase(), GamePhase::Playing);

        drop_on_player(&mut game, ObjectKind::Coin);
        let report = game.frame(1016.0, area());
        assert_eq!(report.control, LoopControl::Continue);
        assert_eq!(game.state().score, 1);

        drop_on_player(&mut game, ObjectKind::Enemy);
        let report = game.frame(1032.0, area());
        assert_eq!(report.control, LoopControl::Stop);
        assert!(report.new_record);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert!(game.state().objects.is_empty());
        assert_eq!(game.high_score(), 1);
        assert_eq!(game.store().get_u64(HIGH_SCORE_KEY).unwrap(), Some(1));

        // Loop stays stopped until restart
        assert_eq!(game.frame(1048.0, area()).control, LoopControl::Stop);
        assert!(game.start(2000.0, area()));
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().score, 0);
    }

    #[test]
    fn test_lower_score_keeps_record() {
        let mut store = MemoryStore::new();
        store.set_u64(HIGH_SCORE_KEY, 5).unwrap();
        let mut game = game(store);
        assert_eq!(game.high_score(), 5);

        game.start(0.0, area());
        drop_on_player(&mut game, ObjectKind::Enemy);
        let report = game.frame(16.0, area());
        assert!(!report.new_record);
        assert_eq!(game.high_score(), 5);
        assert_eq!(game.store().get_u64(HIGH_SCORE_KEY).unwrap(), Some(5));
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let mut game = game(MemoryStore::new());
        game.start(0.0, area());
        drop_on_player(&mut game, ObjectKind::Coin);
        game.frame(16.0, area());
        assert!(!game.start(32.0, area()));
        assert_eq!(game.state().score, 1);
    }

    #[test]
    fn test_restart_resets_previous_session() {
        let mut game = game(MemoryStore::new());
        game.start(0.0, area());
        game.state.score = 50;
        for i in 0..10 {
            let id = game.state.next_object_id();
            game.state.objects.push(FallingObject {
                id,
                kind: ObjectKind::Coin,
                pos: Vec2::new(i as f32 * 30.0, 0.0),
                size: 36.0,
                spawned_at_ms: 0.0,
            });
        }
        drop_on_player(&mut game, ObjectKind::Enemy);
        game.frame(16.0, area());
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.high_score(), 50);

        game.start(5000.0, area());
        assert_eq!(game.state().score, 0);
        assert!(game.state().objects.is_empty());
        assert_eq!(game.context().game_time_ms, 0.0);
    }

    #[test]
    fn test_high_score_survives_reload() {
        let mut game = game(MemoryStore::new());
        game.start(0.0, area());
        game.state.score = 42;
        drop_on_player(&mut game, ObjectKind::Enemy);
        game.frame(16.0, area());

        let store = game.store().clone();
        let reloaded = Game::with_rng(Tuning::default(), store, Pcg32::seed_from_u64(1));
        assert_eq!(reloaded.high_score(), 42);
    }

    #[test]
    fn test_held_keys_move_player() {
        let mut game = game(MemoryStore::new());
        game.start(0.0, area());
        let x = game.state().player.pos.x;
        game.input_mut().key_down("ArrowRight");
        game.frame(16.0, area());
        assert_eq!(game.state().player.pos.x, x + 7.0);
    }

    #[test]
    fn test_autopilot_survives_a_while() {
        let mut game = game(MemoryStore::new());
        game.set_autopilot(true);
        game.start(0.0, area());
        for i in 1..=600 {
            if game.frame(i as f64 * 16.0, area()).control == LoopControl::Stop {
                break;
            }
        }
        // Whatever happened, the player never left the field
        let x = game.state().player.pos.x;
        assert!((0.0..=352.0).contains(&x));
    }
}
