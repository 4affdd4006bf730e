//! Remote dispatch seam and its result types.
//!
//! The REST client is an external collaborator: the engine only knows the
//! [`EventsApi`] trait, one async method per action kind. Implementations
//! live in the application shell; tests use recording doubles.

use async_trait::async_trait;
use gather_core::{Coordinates, EventDraft};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An event draft with coordinates guaranteed present, ready to submit.
///
/// Built at replay time: either from coordinates captured with the draft
/// or from a lazy geocode of the place name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSubmission {
    /// Event title.
    pub title: String,
    /// Free-text place name.
    pub place: String,
    /// Resolved coordinates.
    pub coordinates: Coordinates,
    /// Scheduled start.
    pub starts_at: chrono::DateTime<chrono::Utc>,
    /// Category slug.
    pub category: String,
    /// Free-form description.
    pub description: String,
    /// Ticket price in cents.
    pub price_cents: u32,
    /// Local path of a photo to upload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_path: Option<String>,
}

impl EventSubmission {
    /// Combine a draft with resolved coordinates.
    #[must_use]
    pub fn from_draft(draft: EventDraft, coordinates: Coordinates) -> Self {
        Self {
            title: draft.title,
            place: draft.place,
            coordinates,
            starts_at: draft.starts_at,
            category: draft.category,
            description: draft.description,
            price_cents: draft.price_cents,
            photo_path: draft.photo_path,
        }
    }
}

/// Server acknowledgment of a dispatched action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchAck {
    /// Server-assigned id of the created resource, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// User-facing message from the server, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Why a dispatched action failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// Transport failure — the request may never have reached the server.
    #[error("network error: {reason}")]
    Network {
        /// Transport-level detail.
        reason: String,
    },

    /// The server received and refused the action (validation, auth,
    /// business rule). Retrying the same payload cannot succeed.
    #[error("rejected by server: {reason}")]
    Rejected {
        /// Server-provided reason.
        reason: String,
    },
}

impl DispatchError {
    /// Whether a later identical attempt could plausibly succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

/// Remote API surface for queued actions.
///
/// One method per [`gather_core::OfflineAction`] kind; the synchronizer's
/// exhaustive match keeps the two in lockstep.
#[async_trait]
pub trait EventsApi: Send + Sync {
    /// Create an event.
    async fn create_event(
        &self,
        submission: &EventSubmission,
    ) -> Result<DispatchAck, DispatchError>;

    /// Post a comment on an event.
    async fn create_comment(&self, event_id: u64, text: &str)
    -> Result<DispatchAck, DispatchError>;

    /// Register the current user for an event.
    async fn register_for_event(&self, event_id: u64) -> Result<DispatchAck, DispatchError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
