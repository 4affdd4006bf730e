//! # gather-core
//!
//! Foundation types for the Gather offline action queue.
//!
//! This crate provides the shared vocabulary the engine crates depend on:
//!
//! - **Actions**: [`actions::OfflineAction`] tagged union of user intents
//!   recorded while disconnected, with [`actions::QueuedAction`] as the
//!   persisted envelope
//! - **Geo**: [`actions::Coordinates`] in decimal degrees
//! - **Notices**: [`notice::Notice`] one-shot user-facing notifications and
//!   the [`notice::NoticeSink`] fire-and-forget seam
//! - **Logging**: [`logging::init_subscriber`] for tracing setup
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `gather-geo` and `gather-offline`.

#![deny(unsafe_code)]

pub mod actions;
pub mod logging;
pub mod notice;

pub use actions::{Coordinates, EventDraft, OfflineAction, QueuedAction};
pub use notice::{Notice, NoticeKind, NoticeSink, TracingNoticeSink};
