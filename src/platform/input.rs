//! Keyboard state tracking
//!
//! Raw key-down/key-up events update a table of held keys. The simulation
//! polls it once per tick and never writes to it.

use std::collections::HashMap;

use crate::sim::TickInput;

/// Keys that move the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    ArrowLeft,
    ArrowRight,
    A,
    D,
}

impl MoveKey {
    /// Map a platform key identifier (`KeyboardEvent.key`) to a movement key
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(MoveKey::ArrowLeft),
            "ArrowRight" => Some(MoveKey::ArrowRight),
            "a" | "A" => Some(MoveKey::A),
            "d" | "D" => Some(MoveKey::D),
            _ => None,
        }
    }

    pub fn is_left(&self) -> bool {
        matches!(self, MoveKey::ArrowLeft | MoveKey::A)
    }
}

/// Last-known held state of each movement key
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    held: HashMap<MoveKey, bool>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press; returns `false` for keys that don't move the player
    pub fn key_down(&mut self, key: &str) -> bool {
        self.set(key, true)
    }

    /// Record a key release; returns `false` for keys that don't move the player
    pub fn key_up(&mut self, key: &str) -> bool {
        self.set(key, false)
    }

    fn set(&mut self, key: &str, pressed: bool) -> bool {
        match MoveKey::from_key(key) {
            Some(k) => {
                self.held.insert(k, pressed);
                true
            }
            None => false,
        }
    }

    /// Forget every held key (window lost focus, key-ups will never arrive)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.held.get(&key).copied().unwrap_or(false)
    }

    /// Snapshot for one tick
    pub fn tick_input(&self) -> TickInput {
        let mut input = TickInput::default();
        for (key, _) in self.held.iter().filter(|(_, held)| **held) {
            if key.is_left() {
                input.left = true;
            } else {
                input.right = true;
            }
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut input = InputTracker::new();
        assert!(input.key_down("ArrowLeft"));
        assert!(input.is_held(MoveKey::ArrowLeft));
        assert!(input.tick_input().left);

        assert!(input.key_up("ArrowLeft"));
        assert_eq!(input.tick_input(), TickInput::default());
    }

    #[test]
    fn test_aliases_are_tracked_per_key() {
        let mut input = InputTracker::new();
        input.key_down("ArrowRight");
        input.key_down("d");
        input.key_up("d");
        // Arrow is still down
        assert!(input.tick_input().right);
    }

    #[test]
    fn test_both_directions() {
        let mut input = InputTracker::new();
        input.key_down("a");
        input.key_down("ArrowRight");
        let tick = input.tick_input();
        assert!(tick.left && tick.right);
        assert_eq!(tick.direction(), 0.0);
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut input = InputTracker::new();
        assert!(!input.key_down("ArrowUp"));
        assert!(!input.key_down(" "));
        assert_eq!(input.tick_input(), TickInput::default());
    }

    #[test]
    fn test_release_all() {
        let mut input = InputTracker::new();
        input.key_down("a");
        input.key_down("D");
        input.release_all();
        assert_eq!(input.tick_input(), TickInput::default());
    }
}
