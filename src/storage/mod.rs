//! Session-scoped key/value storage.
//!
//! The restorer persists its whole history cache under a single key. Values
//! are always strings; encoding happens in the cache, not here.
//!
//! # Usage
//!
//! ```no_run
//! use scroll_restore::storage::{MemoryStorage, SessionStorage};
//!
//! let mut storage = MemoryStorage::new();
//! storage.set("scrollHistory", "{\"urls\":[],\"scrolly\":[]}").unwrap();
//! assert!(storage.get("scrollHistory").unwrap().is_some());
//! ```

use std::collections::HashMap;

use crate::types::errors::StorageError;

#[cfg(feature = "sqlite")]
pub mod migrations;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;

/// Key under which the scroll history snapshot is stored.
pub const SCROLL_HISTORY_KEY: &str = "scrollHistory";

/// Trait defining the session storage contract.
pub trait SessionStorage: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage for environments without a session store.
///
/// Reads are always empty and writes are dropped, so nothing survives
/// a navigation.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

impl SessionStorage for UnavailableStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}
