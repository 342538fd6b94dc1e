//! In-Memory Entries Module
//!
//! The unbounded key to payload map held in front of the store.

use std::collections::HashMap;

// == Memory Map ==
/// Payloads written through this process. Never evicts.
#[derive(Debug, Default)]
pub struct MemoryMap {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the payload cached for `key`.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Stores `data` under `key`, replacing any previous payload.
    pub fn insert(&mut self, key: &str, data: &[u8]) {
        match self.entries.get_mut(key) {
            Some(existing) => {
                existing.clear();
                existing.extend_from_slice(data);
            }
            None => {
                self.entries.insert(key.to_string(), data.to_vec());
            }
        }
    }

    /// Removes `key`. Returns true if it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Returns true if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
