//! # gather-offline
//!
//! Offline action queue and reconciliation engine for the Gather events app.
//!
//! Users keep creating events, commenting, and registering while
//! disconnected; this crate records those intents durably and replays them
//! in order once connectivity returns. The subsystems:
//!
//! - **Storage**: [`storage::KeyValueStore`] over `SQLite`
//!   ([`storage::SqliteStore`]) or memory ([`storage::MemoryStore`])
//! - **Queue**: [`queue::PendingQueue`] — the persisted FIFO of
//!   [`gather_core::QueuedAction`] records under one fixed key
//! - **Monitor**: [`monitor::ConnectivityMonitor`] — deduped boolean
//!   connectivity transitions over a watch channel
//! - **Dispatch seam**: [`dispatch::EventsApi`] — one async method per
//!   action kind, implemented by the application's REST client
//! - **Engine**: [`sync::QueueManager`] — enqueue, single-flight replay
//!   pass, per-item notices, policy-driven clear/requeue/retain
//! - **Settings**: [`settings::OfflineSettings`] — defaults ← JSON file ←
//!   `GATHER_*` env overrides
//!
//! The engine owns no UI: outcomes surface through
//! [`gather_core::NoticeSink`], one notice per processed entry.

#![deny(unsafe_code)]

pub mod dispatch;
pub mod errors;
pub mod monitor;
pub mod queue;
pub mod settings;
pub mod storage;
pub mod sync;

pub use dispatch::{DispatchAck, DispatchError, EventSubmission, EventsApi};
pub use errors::{SettingsError, StorageError};
pub use monitor::ConnectivityMonitor;
pub use queue::PendingQueue;
pub use settings::OfflineSettings;
pub use sync::{
    DisconnectMode, FailureMode, ItemOutcome, ItemReport, QueueManager, SyncOutcome, SyncPolicy,
    SyncReport,
};
