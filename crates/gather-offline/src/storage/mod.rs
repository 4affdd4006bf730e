//! Durable key-value storage behind the queue.
//!
//! The queue needs exactly three operations on one fixed key, so the
//! storage seam is a minimal [`KeyValueStore`] trait. Production uses
//! [`SqliteStore`]; tests and simulated restarts use [`MemoryStore`].

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::errors::Result;

pub mod sqlite;

pub use sqlite::SqliteStore;

/// Minimal durable key-value contract.
///
/// Any store that can read, write, and delete a string value under a
/// string key satisfies the queue's persistence needs.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// Must be flushed before returning: a process kill after `put`
    /// returns must not lose the write.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` entirely. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

/// In-memory store for tests.
///
/// Shared via `Arc` it also simulates "durable across restart": drop every
/// other handle and build a fresh queue over the same store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let _ = self
            .entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let _ = self.entries.lock().remove(key);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
