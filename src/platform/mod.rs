//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (polled key-state table)
//! - Time and frame scheduling

pub mod input;
pub mod time;

pub use input::{InputTracker, MoveKey};
pub use time::{Clock, FrameLoop, FrameScheduler, ManualClock, ManualScheduler};
#[cfg(target_arch = "wasm32")]
pub use time::PerformanceClock;
