//! Game state and core simulation types
//!
//! Everything the presentation layer reads lives here. Timing anchors and
//! difficulty live in [`super::SimulationContext`] instead.

use glam::Vec2;
use serde::Serialize;

use super::collision::Rect;

/// Which part of the game is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GamePhase {
    /// Title screen, only ever the initial phase
    #[default]
    Start,
    /// Simulation loop is running
    Playing,
    /// Hit an enemy; waiting for restart
    GameOver,
}

/// Size of the play area in pixels, re-read every frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A zero-sized (or collapsed) area can't host a game
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// The player's sprite
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    /// Edge length
    pub size: f32,
}

impl Player {
    /// Centre horizontally, resting `margin` pixels above the bottom edge
    pub fn centered(area: PlayArea, size: f32, margin: f32) -> Self {
        Self {
            pos: Vec2::new(
                ((area.width - size) / 2.0).max(0.0),
                area.height - size - margin,
            ),
            size,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    /// Move by `dx` and keep the sprite inside `[0, width - size]`
    pub fn shift(&mut self, dx: f32, area_width: f32) {
        // min-then-max so a play area narrower than the sprite pins x to 0
        self.pos.x = (self.pos.x + dx).min(area_width - self.size).max(0.0);
    }
}

/// What a falling object does to the player on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Coin,
    Enemy,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Coin => "coin",
            ObjectKind::Enemy => "enemy",
        }
    }
}

/// A coin or enemy dropping from the top of the play area
#[derive(Debug, Clone)]
pub struct FallingObject {
    pub id: u64,
    pub kind: ObjectKind,
    /// Top-left corner; x never changes after spawn
    pub pos: Vec2,
    pub size: f32,
    /// Frame timestamp (ms) at which the object appeared
    pub spawned_at_ms: f64,
}

impl FallingObject {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }
}

/// Everything the presentation layer needs to draw a frame
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub player: Player,
    /// Live objects in spawn order
    pub objects: Vec<FallingObject>,
    next_id: u64,
}

impl GameState {
    /// Title-screen state; the player is placed properly on start
    pub fn new(player_size: f32) -> Self {
        Self {
            phase: GamePhase::Start,
            score: 0,
            player: Player {
                pos: Vec2::ZERO,
                size: player_size,
            },
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new object ID
    pub fn next_object_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
