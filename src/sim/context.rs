//! Difficulty and timing anchors owned by the loop driver
//!
//! Kept apart from [`super::GameState`] because nothing here is rendered; it is
//! passed by `&mut` into every tick and reset on every (re)start.

use crate::tuning::Tuning;

/// Current difficulty; both values only move in the harder direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyState {
    /// Fall distance per tick
    pub object_speed: f64,
    /// Minimum milliseconds between spawns
    pub spawn_interval_ms: f64,
}

impl DifficultyState {
    pub fn initial(tuning: &Tuning) -> Self {
        Self {
            object_speed: tuning.initial_object_speed,
            spawn_interval_ms: tuning.initial_spawn_interval_ms,
        }
    }
}

/// Mutable simulation bookkeeping that lives outside the rendered state
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub difficulty: DifficultyState,
    /// Timestamp of the previous tick; `None` until the first tick
    pub last_tick_ms: Option<f64>,
    /// Timestamp of the most recent spawn
    pub last_spawn_ms: f64,
    /// Simulated time accumulated since start
    pub game_time_ms: f64,
    /// `game_time_ms` at the most recent spawn-interval ratchet
    pub last_ratchet_ms: f64,
}

impl SimulationContext {
    /// Fresh context with every timing anchor at `now_ms`
    pub fn new(tuning: &Tuning, now_ms: f64) -> Self {
        Self {
            difficulty: DifficultyState::initial(tuning),
            last_tick_ms: Some(now_ms),
            last_spawn_ms: now_ms,
            game_time_ms: 0.0,
            last_ratchet_ms: 0.0,
        }
    }

    /// Back to initial difficulty, anchored at `now_ms`
    pub fn reset(&mut self, tuning: &Tuning, now_ms: f64) {
        *self = Self::new(tuning, now_ms);
    }

    /// Record a frame timestamp and return the elapsed milliseconds
    ///
    /// The first tick after construction without an anchor reports zero, as does
    /// a timestamp that runs backwards.
    pub fn advance_clock(&mut self, timestamp_ms: f64) -> f64 {
        let last = self.last_tick_ms.unwrap_or(timestamp_ms);
        self.last_tick_ms = Some(timestamp_ms);
        let delta = (timestamp_ms - last).max(0.0);
        self.game_time_ms += delta;
        delta
    }

    /// Compound the fall speed and, once per ratchet period, shorten the spawn interval
    ///
    /// Returns `true` if the spawn interval ratcheted this tick. Skipped periods
    /// are not caught up.
    pub fn ramp_difficulty(&mut self, tuning: &Tuning) -> bool {
        self.difficulty.object_speed *= tuning.speed_growth;
        if self.game_time_ms - self.last_ratchet_ms >= tuning.ratchet_period_ms {
            self.difficulty.spawn_interval_ms *= tuning.spawn_interval_decay;
            self.last_ratchet_ms = self.game_time_ms;
            return true;
        }
        false
    }

    /// Whether enough time has passed since the last spawn
    #[inline]
    pub fn spawn_due(&self, timestamp_ms: f64) -> bool {
        timestamp_ms - self.last_spawn_ms > self.difficulty.spawn_interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_without_anchor_has_zero_delta() {
        let tuning = Tuning::default();
        let mut ctx = SimulationContext::new(&tuning, 0.0);
        ctx.last_tick_ms = None;
        assert_eq!(ctx.advance_clock(5000.0), 0.0);
        assert_eq!(ctx.game_time_ms, 0.0);
        assert_eq!(ctx.advance_clock(5016.0), 16.0);
        assert_eq!(ctx.game_time_ms, 16.0);
    }

    #[test]
    fn test_backwards_timestamp_is_ignored() {
        let tuning = Tuning::default();
        let mut ctx = SimulationContext::new(&tuning, 100.0);
        assert_eq!(ctx.advance_clock(90.0), 0.0);
        assert_eq!(ctx.game_time_ms, 0.0);
    }

    #[test]
    fn test_ratchet_fires_once_without_catch_up() {
        let tuning = Tuning::default();
        let mut ctx = SimulationContext::new(&tuning, 0.0);

        // A five-minute stall only ratchets once
        ctx.advance_clock(300_000.0);
        assert!(ctx.ramp_difficulty(&tuning));
        assert_eq!(ctx.difficulty.spawn_interval_ms, 990.0);
        assert_eq!(ctx.last_ratchet_ms, 300_000.0);

        ctx.advance_clock(300_016.0);
        assert!(!ctx.ramp_difficulty(&tuning));
        assert_eq!(ctx.difficulty.spawn_interval_ms, 990.0);
    }

    #[test]
    fn test_ratchet_at_exact_boundary() {
        let tuning = Tuning::default();
        let mut ctx = SimulationContext::new(&tuning, 0.0);
        ctx.advance_clock(59_999.0);
        assert!(!ctx.ramp_difficulty(&tuning));
        ctx.advance_clock(60_000.0);
        assert!(ctx.ramp_difficulty(&tuning));
    }

    #[test]
    fn test_speed_compounds_at_full_precision() {
        let tuning = Tuning::default();
        let mut ctx = SimulationContext::new(&tuning, 0.0);
        // Ten minutes at 60 Hz
        for _ in 0..36_000 {
            ctx.ramp_difficulty(&tuning);
        }
        let expected = 1.5 * 1.000_038_9_f64.powi(36_000);
        assert!((ctx.difficulty.object_speed - expected).abs() < 1e-9);
        assert!((ctx.difficulty.object_speed - 6.085_068).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_due_is_strict() {
        let tuning = Tuning::default();
        let ctx = SimulationContext::new(&tuning, 0.0);
        assert!(!ctx.spawn_due(1000.0));
        assert!(ctx.spawn_due(1000.5));
    }
}
