//! Presentation snapshot
//!
//! Everything a renderer needs for one frame, detached from simulation
//! internals. The browser DOM renderer and native logging both consume it.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{GamePhase, GameState, ObjectKind};

/// Game title shown in the header and on the start screen
pub const TITLE: &str = "Avoid him!";

/// One falling object as drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObjectView {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub kind: ObjectKind,
}

/// Text of the overlay shown whenever the game isn't running
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Modal {
    pub title: &'static str,
    pub button: &'static str,
    /// Score of the run that just ended
    pub final_score: Option<u64>,
    pub high_score: u64,
    /// Controls help, start screen only
    pub hint: Option<&'static str>,
}

/// Renderable state for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub player: Vec2,
    pub player_size: f32,
    pub object_size: f32,
    pub objects: Vec<ObjectView>,
}

impl GameView {
    pub fn new(state: &GameState, high_score: u64, object_size: f32) -> Self {
        Self {
            phase: state.phase,
            score: state.score,
            high_score,
            player: state.player.pos,
            player_size: state.player.size,
            object_size,
            objects: state
                .objects
                .iter()
                .map(|o| ObjectView {
                    id: o.id,
                    x: o.pos.x,
                    y: o.pos.y,
                    kind: o.kind,
                })
                .collect(),
        }
    }

    /// Sprites are only drawn while a run is in progress
    pub fn shows_playfield(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Overlay for the start and game-over screens
    pub fn modal(&self) -> Option<Modal> {
        match self.phase {
            GamePhase::Playing => None,
            GamePhase::Start => Some(Modal {
                title: TITLE,
                button: "Start Game",
                final_score: None,
                high_score: self.high_score,
                hint: Some("Use Arrow Keys or A/D to move."),
            }),
            GamePhase::GameOver => Some(Modal {
                title: "You're dead",
                button: "Restart",
                final_score: Some(self.score),
                high_score: self.high_score,
                hint: None,
            }),
        }
    }
}
