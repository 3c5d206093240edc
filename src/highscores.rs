//! Best score, persisted under a fixed key
//!
//! Read once at startup, written at most once per game over.

use crate::persistence::KeyValueStore;

/// Storage key for the best score
pub const HIGH_SCORE_KEY: &str = "fallingSquaresHighScore";

/// The single best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Whether `score` would set a new record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Load from storage; anything unreadable counts as no record
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get_u64(HIGH_SCORE_KEY) {
            Ok(Some(best)) => {
                log::info!("Loaded high score {}", best);
                Self { best }
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load high score: {}", e);
                Self::default()
            }
        }
    }

    /// Record a finished run; returns `true` if it set a new record
    ///
    /// The new record is kept in memory even if the write fails.
    pub fn record(&mut self, score: u64, store: &mut impl KeyValueStore) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        match store.set_u64(HIGH_SCORE_KEY, score) {
            Ok(()) => log::info!("New high score {} saved", score),
            Err(e) => log::warn!("New high score {} not saved: {}", score, e),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_persist_and_reload() {
        let mut store = MemoryStore::new();
        let mut high = HighScore::load(&store);
        assert_eq!(high.best(), 0);

        assert!(high.record(42, &mut store));
        assert_eq!(HighScore::load(&store).best(), 42);
    }

    #[test]
    fn test_only_strictly_higher_scores_qualify() {
        let mut store = MemoryStore::new();
        let mut high = HighScore::new(10);
        assert!(!high.record(10, &mut store));
        assert!(!high.record(3, &mut store));
        assert_eq!(store.get_u64(HIGH_SCORE_KEY).unwrap(), None);
        assert!(high.record(11, &mut store));
        assert_eq!(high.best(), 11);
    }

    #[test]
    fn test_corrupt_value_loads_as_zero() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "garbage").unwrap();
        assert_eq!(HighScore::load(&store).best(), 0);
    }

    #[test]
    fn test_failed_write_keeps_record_in_memory() {
        let mut store = MemoryStore::read_only();
        let mut high = HighScore::default();
        assert!(high.record(7, &mut store));
        assert_eq!(high.best(), 7);
    }
}
