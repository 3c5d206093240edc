//! Browser LocalStorage backend

use web_sys::Storage;

use super::{KeyValueStore, PersistenceError};

/// `window.localStorage`, resolved once at startup
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    /// Open LocalStorage; a missing or blocked storage yields a store whose
    /// every call fails with [`PersistenceError::Unavailable`]
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - scores won't persist");
        }
        Self { storage }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let storage = self.storage.as_ref().ok_or(PersistenceError::Unavailable)?;
        storage.get_item(key).map_err(|e| PersistenceError::Read {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let storage = self.storage.as_ref().ok_or(PersistenceError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| PersistenceError::Write {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}
