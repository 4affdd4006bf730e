//! The queue synchronizer: enqueue, replay, single-flight.
//!
//! [`QueueManager`] owns the persisted queue, an in-memory mirror for UI
//! badge counts, and the replay pass. One pass: snapshot the queue, walk
//! it in enqueue order, dispatch each entry (geocoding lazily where the
//! draft has no coordinates), emit one notice per entry, then persist the
//! post-pass queue according to [`SyncPolicy`].
//!
//! Passes are single-flight: a CAS flag admits one pass at a time and
//! later triggers are dropped, not queued — connectivity flapping must
//! not cause pass storms. The flag is released on every exit path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gather_core::{Notice, NoticeSink, OfflineAction, QueuedAction};
use gather_geo::GeoResolver;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::dispatch::{EventSubmission, EventsApi};
use crate::errors::StorageError;
use crate::monitor::ConnectivityMonitor;
use crate::queue::PendingQueue;
use crate::storage::KeyValueStore;

// ─────────────────────────────────────────────────────────────────────────────
// Policy
// ─────────────────────────────────────────────────────────────────────────────

/// What happens to entries that failed during a pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureMode {
    /// Attempt all, clear all: failed entries are dropped with the rest.
    ///
    /// The historical behavior of the app. Lossy on transient errors, but
    /// a poison-pill entry can never block the queue.
    #[default]
    DropAll,
    /// Keep entries that failed transiently (network) for the next pass.
    /// Terminal failures (server rejection, unresolvable place) are still
    /// dropped.
    RequeueTransient,
}

/// What happens when connectivity drops mid-pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisconnectMode {
    /// Keep attempting the remaining entries; they will fail through the
    /// normal per-entry path. The historical behavior.
    #[default]
    ContinuePass,
    /// Stop dispatching and retain every unattempted entry.
    AbortAndRetain,
}

/// Pass policy: failure handling plus mid-pass disconnect handling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPolicy {
    /// Failed-entry handling.
    #[serde(default)]
    pub failure: FailureMode,
    /// Mid-pass disconnect handling.
    #[serde(default)]
    pub disconnect: DisconnectMode,
}

// ─────────────────────────────────────────────────────────────────────────────
// Report
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of one queue entry within a pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Dispatched and acknowledged.
    Succeeded {
        /// Server-assigned id, if the server returned one.
        remote_id: Option<u64>,
        /// Server-provided user-facing message, if any.
        message: Option<String>,
    },
    /// Dispatch (or prerequisite geocoding) failed.
    Failed {
        /// Human-readable reason, surfaced in the error notice.
        reason: String,
        /// Whether a later identical attempt could plausibly succeed.
        transient: bool,
    },
    /// Never attempted: the pass aborted first (`AbortAndRetain`).
    Skipped,
}

/// Per-entry record within a [`SyncReport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemReport {
    /// Queue entry id.
    pub id: Uuid,
    /// Action kind tag.
    pub kind: &'static str,
    /// What happened.
    pub outcome: ItemOutcome,
}

/// Full record of one pass, in replay order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// One record per snapshot entry.
    pub items: Vec<ItemReport>,
}

impl SyncReport {
    /// Number of acknowledged entries.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, ItemOutcome::Succeeded { .. }))
            .count()
    }

    /// Number of failed entries.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, ItemOutcome::Failed { .. }))
            .count()
    }

    /// Number of entries never attempted.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, ItemOutcome::Skipped))
            .count()
    }
}

/// Result of a [`QueueManager::sync`] call. Never an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Another pass holds the single-flight lock; this trigger was dropped.
    AlreadyRunning,
    /// The queue was empty: no dispatches, no storage writes.
    Nothing,
    /// A full pass ran.
    Completed(SyncReport),
}

// ─────────────────────────────────────────────────────────────────────────────
// Manager
// ─────────────────────────────────────────────────────────────────────────────

/// Releases the single-flight flag on every exit path.
struct ReleaseOnDrop<'a>(&'a AtomicBool);

impl Drop for ReleaseOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owner of the offline queue: write path, replay path, guard.
///
/// Dependencies are injected so the engine is UI-framework-free and
/// testable with doubles: storage, the REST client, the geocoder, and
/// the notice sink.
pub struct QueueManager {
    queue: PendingQueue,
    api: Arc<dyn EventsApi>,
    geo: Arc<dyn GeoResolver>,
    notices: Arc<dyn NoticeSink>,
    policy: SyncPolicy,
    /// In-memory mirror of the persisted queue, for `pending_count`
    /// without a storage read. Updated only after a successful persist.
    mirror: Mutex<Vec<QueuedAction>>,
    syncing: AtomicBool,
    /// Connectivity receiver, present once a monitor is attached.
    link: Mutex<Option<watch::Receiver<bool>>>,
}

impl std::fmt::Debug for QueueManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueManager")
            .field("policy", &self.policy)
            .field("pending", &self.mirror.lock().len())
            .finish_non_exhaustive()
    }
}

impl QueueManager {
    /// Build a manager over the given store and collaborators.
    ///
    /// Loads any persisted queue into the mirror eagerly so
    /// [`Self::pending_count`] is correct before the first pass.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn EventsApi>,
        geo: Arc<dyn GeoResolver>,
        notices: Arc<dyn NoticeSink>,
    ) -> Self {
        let queue = PendingQueue::new(store);
        let mirror = queue.load();
        Self {
            queue,
            api,
            geo,
            notices,
            policy: SyncPolicy::default(),
            mirror: Mutex::new(mirror),
            syncing: AtomicBool::new(false),
            link: Mutex::new(None),
        }
    }

    /// Override the pass policy.
    #[must_use]
    pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    // ── Write path ────────────────────────────────────────────────────

    /// Record a user intent for later replay.
    ///
    /// Persists first, then updates the mirror: if persistence fails the
    /// call fails entirely and the mirror (and UI count) is untouched.
    pub fn enqueue(&self, action: OfflineAction) -> Result<QueuedAction, StorageError> {
        let queued = QueuedAction::new(action);
        self.queue.append(&queued)?;
        self.mirror.lock().push(queued.clone());
        Ok(queued)
    }

    /// Snapshot of the pending actions, from the mirror.
    #[must_use]
    pub fn pending(&self) -> Vec<QueuedAction> {
        self.mirror.lock().clone()
    }

    /// Number of pending actions, from the mirror.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.mirror.lock().len()
    }

    // ── Connectivity wiring ───────────────────────────────────────────

    /// Attach a monitor: every disconnected→connected transition triggers
    /// one sync attempt. Returns the watcher task handle.
    pub fn watch_connectivity(
        self: &Arc<Self>,
        monitor: &ConnectivityMonitor,
    ) -> tokio::task::JoinHandle<()> {
        *self.link.lock() = Some(monitor.subscribe());
        let mut rx = monitor.subscribe();
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let connected = *rx.borrow_and_update();
                if connected {
                    info!("connectivity restored, draining offline queue");
                    let _ = manager.sync().await;
                }
            }
        })
    }

    fn link_offline(&self) -> bool {
        self.link.lock().as_ref().is_some_and(|rx| !*rx.borrow())
    }

    // ── Replay path ───────────────────────────────────────────────────

    /// Run one replay pass. Never returns an error: per-entry failures
    /// become notices and [`ItemOutcome::Failed`] records.
    pub async fn sync(&self) -> SyncOutcome {
        if self
            .syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("sync pass already in flight, trigger dropped");
            return SyncOutcome::AlreadyRunning;
        }
        let _running = ReleaseOnDrop(&self.syncing);

        let snapshot = self.queue.load();
        if snapshot.is_empty() {
            debug!("offline queue empty, nothing to sync");
            return SyncOutcome::Nothing;
        }

        info!(pending = snapshot.len(), "draining offline queue");
        let mut items = Vec::with_capacity(snapshot.len());
        let mut attempted = 0usize;

        for entry in &snapshot {
            if self.policy.disconnect == DisconnectMode::AbortAndRetain && self.link_offline() {
                warn!(
                    remaining = snapshot.len() - attempted,
                    "connectivity lost mid-pass, retaining remaining actions"
                );
                break;
            }
            let outcome = self.replay(entry).await;
            self.notify(entry, &outcome);
            items.push(ItemReport {
                id: entry.id,
                kind: entry.action.kind(),
                outcome,
            });
            attempted += 1;
        }
        for entry in &snapshot[attempted..] {
            items.push(ItemReport {
                id: entry.id,
                kind: entry.action.kind(),
                outcome: ItemOutcome::Skipped,
            });
        }

        // Clearing only after the whole snapshot was accounted for, and
        // silently — notices are strictly per-entry.
        let retained = self.retained(&snapshot, &items);
        let persist = if retained.is_empty() {
            self.queue.clear()
        } else {
            self.queue.replace(&retained)
        };
        if let Err(e) = persist {
            warn!(error = %e, "failed to persist queue after sync pass");
        }
        *self.mirror.lock() = retained;

        let report = SyncReport { items };
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped(),
            "sync pass complete"
        );
        SyncOutcome::Completed(report)
    }

    /// Dispatch one entry, geocoding lazily when the draft carries no
    /// coordinates.
    async fn replay(&self, entry: &QueuedAction) -> ItemOutcome {
        let result = match &entry.action {
            OfflineAction::CreateEvent { draft } => {
                let coordinates = match draft.coordinates {
                    Some(c) => c,
                    None => match self.geo.resolve(&draft.place).await {
                        Ok(c) => c,
                        Err(e) => {
                            return ItemOutcome::Failed {
                                reason: e.to_string(),
                                transient: e.is_retryable(),
                            };
                        }
                    },
                };
                let submission = EventSubmission::from_draft(draft.clone(), coordinates);
                self.api.create_event(&submission).await
            }
            OfflineAction::CreateComment { event_id, text } => {
                self.api.create_comment(*event_id, text).await
            }
            OfflineAction::RegisterForEvent { event_id } => {
                self.api.register_for_event(*event_id).await
            }
        };

        match result {
            Ok(ack) => ItemOutcome::Succeeded {
                remote_id: ack.id,
                message: ack.message,
            },
            Err(e) => ItemOutcome::Failed {
                reason: e.to_string(),
                transient: e.is_transient(),
            },
        }
    }

    /// Exactly one notice per processed entry; skipped entries get none.
    fn notify(&self, entry: &QueuedAction, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Succeeded { message, .. } => {
                let text = message
                    .clone()
                    .unwrap_or_else(|| format!("Synced: {}", entry.action.describe()));
                self.notices.notify(Notice::success(text));
            }
            ItemOutcome::Failed { reason, .. } => {
                self.notices.notify(Notice::error(format!(
                    "Could not sync {}: {reason}",
                    entry.action.describe()
                )));
            }
            ItemOutcome::Skipped => {}
        }
    }

    /// Entries to keep after a pass, in their original relative order.
    fn retained(&self, snapshot: &[QueuedAction], items: &[ItemReport]) -> Vec<QueuedAction> {
        snapshot
            .iter()
            .zip(items)
            .filter(|(_, report)| match &report.outcome {
                ItemOutcome::Skipped => true,
                ItemOutcome::Failed { transient, .. } => {
                    self.policy.failure == FailureMode::RequeueTransient && *transient
                }
                ItemOutcome::Succeeded { .. } => false,
            })
            .map(|(entry, _)| entry.clone())
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
