//! In-process key-value store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStore, Result, StorageError};

/// Key-value store held in memory; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read_lock()?.len())
    }

    /// Whether the store holds no keys.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read_lock()?.is_empty())
    }

    fn read_lock(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, String>>> {
        self.entries
            .read()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
