//! Key-value persistence
//!
//! Backends:
//! - `LocalStore`: browser LocalStorage (wasm32 only)
//! - `MemoryStore`: in-process map for native runs and tests
//!
//! Every caller treats storage as best-effort; errors are reported so they can
//! be logged, never so they can stop the game.

use std::collections::HashMap;

use thiserror::Error;

#[cfg(target_arch = "wasm32")]
mod local;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// Storage failures
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
    #[error("stored value for `{key}` is corrupt: {value:?}")]
    Corrupt { key: String, value: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Read an integer the way the browser's `parseInt` would: leading digits only
    fn get_u64(&self, key: &str) -> Result<Option<u64>, PersistenceError> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        let trimmed = raw.trim_start();
        let digits: &str = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .map_or(trimmed, |end| &trimmed[..end]);
        digits
            .parse::<u64>()
            .map(Some)
            .map_err(|_| PersistenceError::Corrupt {
                key: key.to_string(),
                value: raw.clone(),
            })
    }

    fn set_u64(&mut self, key: &str, value: u64) -> Result<(), PersistenceError> {
        self.set(key, &value.to_string())
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write, like a browser with storage disabled
    pub fn read_only() -> Self {
        Self {
            entries: HashMap::new(),
            read_only: true,
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if self.read_only {
            return Err(PersistenceError::Write {
                key: key.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u64_round_trip() {
        let mut store = MemoryStore::new();
        store.set_u64("score", 42).unwrap();
        assert_eq!(store.get("score").unwrap().as_deref(), Some("42"));
        assert_eq!(store.get_u64("score").unwrap(), Some(42));
    }

    #[test]
    fn test_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get_u64("nothing").unwrap(), None);
    }

    #[test]
    fn test_parses_leading_digits() {
        let mut store = MemoryStore::new();
        store.set("score", "17px").unwrap();
        assert_eq!(store.get_u64("score").unwrap(), Some(17));
    }

    #[test]
    fn test_corrupt_value() {
        let mut store = MemoryStore::new();
        store.set("score", "abc").unwrap();
        assert!(matches!(
            store.get_u64("score"),
            Err(PersistenceError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let mut store = MemoryStore::read_only();
        assert!(matches!(
            store.set_u64("score", 1),
            Err(PersistenceError::Write { .. })
        ));
        assert_eq!(store.get_u64("score").unwrap(), None);
    }
}
