//! Simulation module
//!
//! All gameplay logic lives here. This module has no rendering or platform
//! dependencies:
//! - Time comes in as frame timestamps
//! - Randomness comes in as an `Rng`
//! - Input comes in as a polled [`TickInput`]

pub mod autopilot;
pub mod collision;
pub mod context;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use collision::{Rect, aabb_overlap};
pub use context::{DifficultyState, SimulationContext};
pub use state::{FallingObject, GamePhase, GameState, ObjectKind, PlayArea, Player};
pub use tick::{TickInput, TickOutcome, start_round, tick};
