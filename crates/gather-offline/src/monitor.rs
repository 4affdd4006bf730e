//! Process-wide connectivity state.
//!
//! Wraps the platform reachability signal in a `tokio::sync::watch`
//! channel. Publishing the same state twice is a no-op, so subscribers
//! only ever observe real transitions — connectivity flapping at the
//! platform layer cannot fan out into redundant sync attempts.

use tokio::sync::watch;
use tracing::debug;

/// Deduped boolean connectivity signal.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    /// Create a monitor with the given initial state.
    #[must_use]
    pub fn new(connected: bool) -> Self {
        let (tx, _) = watch::channel(connected);
        Self { tx }
    }

    /// Current state.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        *self.tx.borrow()
    }

    /// Publish a state change. Identical states are dropped.
    pub fn set_connected(&self, connected: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == connected {
                false
            } else {
                *current = connected;
                true
            }
        });
        if changed {
            debug!(connected, "connectivity transition");
        }
    }

    /// Subscribe to transitions.
    ///
    /// The receiver observes the value at subscription time as seen;
    /// `changed()` resolves only on later transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
