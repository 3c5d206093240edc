//! Falling Squares - dodge the enemies, catch the coins
//!
//! Core modules:
//! - `sim`: Per-frame simulation (movement, spawning, collisions, difficulty)
//! - `game`: Lifecycle state machine tying the simulation to input and storage
//! - `platform`: Browser/native platform abstraction (input, time, frame loop)
//! - `persistence`: Key-value storage backends
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::Game;
pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Player sprite edge length (pixels)
    pub const PLAYER_SIZE: f32 = 48.0;
    /// Falling object edge length (pixels)
    pub const OBJECT_SIZE: f32 = 36.0;
    /// Horizontal player movement per tick
    pub const PLAYER_SPEED: f32 = 7.0;
    /// Gap between the player and the bottom edge of the play area
    pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;

    /// Fall distance per tick at the start of a game
    pub const INITIAL_OBJECT_SPEED: f64 = 1.5;
    /// Per-tick multiplier on fall speed (roughly doubles over a few minutes at 60 Hz)
    pub const SPEED_GROWTH: f64 = 1.000_038_9;

    /// Milliseconds between spawns at the start of a game
    pub const INITIAL_SPAWN_INTERVAL_MS: f64 = 1000.0;
    /// Multiplier applied to the spawn interval once per ratchet period
    pub const SPAWN_INTERVAL_DECAY: f64 = 0.99;
    /// Simulated time between spawn interval ratchets
    pub const RATCHET_PERIOD_MS: f64 = 60_000.0;

    /// Chance that a spawned object is a coin rather than an enemy
    pub const COIN_PROBABILITY: f64 = 0.7;
}
