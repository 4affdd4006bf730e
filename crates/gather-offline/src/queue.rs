//! Persisted FIFO of pending offline actions.
//!
//! All mutation is read-modify-write of the whole list under one fixed
//! storage key. There is no partial-update primitive: queue sizes are
//! bounded by how long a user stays offline, so rewriting the list is
//! cheaper than getting item-level updates right.

use std::sync::Arc;

use gather_core::QueuedAction;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::storage::KeyValueStore;

/// Fixed storage key for the serialized queue.
pub const QUEUE_KEY: &str = "offlineQueue";

/// The persisted pending-action list.
///
/// A mutex serializes every read-modify-write so concurrent appends can
/// never interleave and drop each other's entries.
pub struct PendingQueue {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for PendingQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingQueue").finish_non_exhaustive()
    }
}

impl PendingQueue {
    /// Wrap a key-value store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Load the persisted list.
    ///
    /// Fails open: a missing key or corrupt JSON yields an empty queue
    /// (logged), never an error — pending work is best-effort by design
    /// and the app must not crash on a bad snapshot.
    pub fn load(&self) -> Vec<QueuedAction> {
        let raw = match self.store.get(QUEUE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read offline queue, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(actions) => actions,
            Err(e) => {
                warn!(error = %e, "corrupt offline queue snapshot, treating as empty");
                Vec::new()
            }
        }
    }

    /// Append one action and persist the full list.
    ///
    /// Storage failure aborts the append; the persisted list is unchanged.
    pub fn append(&self, action: &QueuedAction) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut actions = self.load();
        actions.push(action.clone());
        self.write(&actions)?;
        debug!(id = %action.id, kind = action.action.kind(), pending = actions.len(), "action enqueued");
        Ok(())
    }

    /// Replace the persisted list wholesale.
    ///
    /// Used by the retain policies after a sync pass; an empty list is
    /// persisted as a delete.
    pub fn replace(&self, actions: &[QueuedAction]) -> Result<()> {
        let _guard = self.write_lock.lock();
        if actions.is_empty() {
            self.store.delete(QUEUE_KEY)
        } else {
            self.write(actions)
        }
    }

    /// Remove the persisted list entirely.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.store.delete(QUEUE_KEY)
    }

    fn write(&self, actions: &[QueuedAction]) -> Result<()> {
        let raw = serde_json::to_string(actions)?;
        self.store.put(QUEUE_KEY, &raw)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use gather_core::OfflineAction;

    use crate::storage::MemoryStore;

    fn comment(event_id: u64, text: &str) -> QueuedAction {
        QueuedAction::new(OfflineAction::CreateComment {
            event_id,
            text: text.into(),
        })
    }

    #[test]
    fn load_empty_when_key_missing() {
        let queue = PendingQueue::new(Arc::new(MemoryStore::new()));
        assert!(queue.load().is_empty());
    }

    #[test]
    fn append_preserves_insertion_order() {
        let queue = PendingQueue::new(Arc::new(MemoryStore::new()));
        let first = comment(1, "first");
        let second = comment(2, "second");
        queue.append(&first).unwrap();
        queue.append(&second).unwrap();

        let loaded = queue.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, first.id);
        assert_eq!(loaded[1].id, second.id);
    }

    #[test]
    fn load_survives_new_queue_over_same_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let action = comment(9, "durable");
        PendingQueue::new(Arc::clone(&store)).append(&action).unwrap();

        // Fresh queue instance, same durable store: simulated restart.
        let loaded = PendingQueue::new(store).load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, action.id);
    }

    #[test]
    fn corrupt_snapshot_loads_as_empty() {
        let store = Arc::new(MemoryStore::new());
        store.put(QUEUE_KEY, "{definitely not a queue").unwrap();
        let queue = PendingQueue::new(store);
        assert!(queue.load().is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let store = Arc::new(MemoryStore::new());
        let queue = PendingQueue::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);
        queue.append(&comment(1, "x")).unwrap();
        queue.clear().unwrap();
        assert!(queue.load().is_empty());
        assert_eq!(store.get(QUEUE_KEY).unwrap(), None);
    }

    #[test]
    fn replace_with_empty_deletes_key() {
        let store = Arc::new(MemoryStore::new());
        let queue = PendingQueue::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);
        queue.append(&comment(1, "x")).unwrap();
        queue.replace(&[]).unwrap();
        assert_eq!(store.get(QUEUE_KEY).unwrap(), None);
    }

    #[test]
    fn replace_keeps_given_order() {
        let queue = PendingQueue::new(Arc::new(MemoryStore::new()));
        let a = comment(1, "a");
        let b = comment(2, "b");
        queue.replace(&[a.clone(), b.clone()]).unwrap();
        let loaded = queue.load();
        assert_eq!(loaded[0].id, a.id);
        assert_eq!(loaded[1].id, b.id);
    }
}
