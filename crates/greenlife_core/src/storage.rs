//! crates/greenlife_core/src/storage.rs
//!
//! An in-process `Persistence` implementation. Useful for tests and for
//! sessions that should not outlive the process.

use parking_lot::Mutex;
use std::collections::HashMap;

use crate::ports::{Persistence, PortResult};

/// Key-value storage held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `key` with a raw value, bypassing any serialization.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries.lock().insert(key.to_string(), value.to_string());
        self
    }

    /// The raw value currently stored under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl Persistence for MemoryStore {
    fn load(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> PortResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
