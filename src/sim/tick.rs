//! Per-frame simulation tick
//!
//! One call advances the world by one display refresh: clock, difficulty,
//! player movement, spawning, falling objects and collisions, in that order.

use rand::Rng;

use super::collision::aabb_overlap;
use super::context::SimulationContext;
use super::state::{FallingObject, GamePhase, GameState, ObjectKind, PlayArea, Player};
use crate::tuning::Tuning;

/// Movement keys held for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

impl TickInput {
    /// Net horizontal direction; holding both cancels out
    pub fn direction(&self) -> f32 {
        let mut dir = 0.0;
        if self.left {
            dir -= 1.0;
        }
        if self.right {
            dir += 1.0;
        }
        dir
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Play area was unusable (or the game isn't running); nothing moved
    pub skipped: bool,
    /// Spawn interval shortened this tick
    pub ratcheted: bool,
    pub spawned: Option<(u64, ObjectKind)>,
    pub coins_collected: u32,
    /// Objects that fell past the bottom edge
    pub dropped: u32,
    /// ID of the enemy that ended the run
    pub enemy_hit: Option<u64>,
}

/// Put the world into a fresh round: empty field, centred player, initial difficulty
pub fn start_round(
    state: &mut GameState,
    ctx: &mut SimulationContext,
    tuning: &Tuning,
    area: PlayArea,
    now_ms: f64,
) {
    state.score = 0;
    state.objects.clear();
    state.player = Player::centered(area, tuning.player_size, tuning.player_bottom_margin);
    ctx.reset(tuning, now_ms);
    state.phase = GamePhase::Playing;
}

/// Advance the game by one frame
///
/// Collisions are tested against the player's rectangle from before this
/// tick's movement, so the hitbox trails the sprite by one frame.
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    ctx: &mut SimulationContext,
    tuning: &Tuning,
    input: TickInput,
    area: PlayArea,
    timestamp_ms: f64,
    rng: &mut R,
) -> TickOutcome {
    let mut outcome = TickOutcome::default();

    if state.phase != GamePhase::Playing {
        outcome.skipped = true;
        return outcome;
    }

    ctx.advance_clock(timestamp_ms);

    if !area.is_usable() {
        outcome.skipped = true;
        return outcome;
    }

    if ctx.ramp_difficulty(tuning) {
        outcome.ratcheted = true;
        log::debug!(
            "Spawn interval ratcheted to {:.1}ms at {:.0}ms game time",
            ctx.difficulty.spawn_interval_ms,
            ctx.game_time_ms
        );
    }

    let player_rect = state.player.rect();
    state
        .player
        .shift(input.direction() * tuning.player_speed, area.width);

    if ctx.spawn_due(timestamp_ms) {
        ctx.last_spawn_ms = timestamp_ms;
        let object = spawn_object(state, tuning, area, timestamp_ms, rng);
        outcome.spawned = Some((object.id, object.kind));
        log::debug!(
            "Spawned {} #{} at x={:.1}",
            object.kind.as_str(),
            object.id,
            object.pos.x
        );
        state.objects.push(object);
    }

    let speed = ctx.difficulty.object_speed as f32;
    let mut survivors = Vec::with_capacity(state.objects.len());
    for mut object in state.objects.drain(..) {
        object.pos.y += speed;

        if aabb_overlap(&player_rect, &object.rect()) {
            match object.kind {
                ObjectKind::Enemy => {
                    outcome.enemy_hit = Some(object.id);
                    break;
                }
                ObjectKind::Coin => {
                    outcome.coins_collected += 1;
                    continue;
                }
            }
        }

        if object.pos.y < area.height {
            survivors.push(object);
        } else {
            outcome.dropped += 1;
        }
    }

    if outcome.enemy_hit.is_some() {
        // Coins caught earlier in this tick don't count
        outcome.coins_collected = 0;
        state.objects.clear();
        state.phase = GamePhase::GameOver;
        return outcome;
    }

    state.objects = survivors;
    if outcome.coins_collected > 0 {
        state.score += u64::from(outcome.coins_collected);
    }

    outcome
}

/// Create an object just above the top edge at a random column
fn spawn_object<R: Rng + ?Sized>(
    state: &mut GameState,
    tuning: &Tuning,
    area: PlayArea,
    timestamp_ms: f64,
    rng: &mut R,
) -> FallingObject {
    let span = (area.width - tuning.object_size).max(0.0);
    let x = rng.random::<f32>() * span;
    let kind = if rng.random::<f64>() < tuning.coin_probability {
        ObjectKind::Coin
    } else {
        ObjectKind::Enemy
    };

    FallingObject {
        id: state.next_object_id(),
        kind,
        pos: glam::Vec2::new(x, -tuning.object_size),
        size: tuning.object_size,
        spawned_at_ms: timestamp_ms,
    }
}
