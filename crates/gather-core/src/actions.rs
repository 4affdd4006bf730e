//! Offline action vocabulary.
//!
//! An [`OfflineAction`] records a user intent captured while the device was
//! disconnected. [`QueuedAction`] is the persisted envelope: the action plus
//! an id and capture timestamp. The persisted wire format is a JSON array of
//! `{id, queuedAt, kind, payload}` records, order preserving — insertion
//! order is replay order.
//!
//! The set of kinds is closed but extensible: adding a variant forces the
//! synchronizer's exhaustive match to handle it at compile time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// Coordinates
// ─────────────────────────────────────────────────────────────────────────────

/// Geographic coordinates in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude, positive north.
    pub latitude: f64,
    /// Longitude, positive east.
    pub longitude: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Drafts
// ─────────────────────────────────────────────────────────────────────────────

/// An event as captured on the create-event screen.
///
/// `coordinates` is filled at capture time only when the device was online
/// to geocode `place`; otherwise it stays `None` and resolution is deferred
/// to replay time (geocoding itself needs connectivity).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    /// Event title.
    pub title: String,
    /// Free-text place name as the user typed it.
    pub place: String,
    /// Resolved coordinates, when available at capture time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Scheduled start of the event.
    pub starts_at: DateTime<Utc>,
    /// Category slug (music, art, sports, ...), lowercased by the UI.
    pub category: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Ticket price in cents; 0 means free.
    #[serde(default)]
    pub price_cents: u32,
    /// Local path of a photo to upload with the submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_path: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Actions
// ─────────────────────────────────────────────────────────────────────────────

/// A user intent recorded while disconnected, awaiting remote execution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum OfflineAction {
    /// Create an event from a locally captured draft.
    #[serde(rename_all = "camelCase")]
    CreateEvent {
        /// The captured draft.
        draft: EventDraft,
    },
    /// Post a comment on an event.
    #[serde(rename_all = "camelCase")]
    CreateComment {
        /// Target event.
        event_id: u64,
        /// Comment body.
        text: String,
    },
    /// Register the current user for an event.
    #[serde(rename_all = "camelCase")]
    RegisterForEvent {
        /// Target event.
        event_id: u64,
    },
}

impl OfflineAction {
    /// Stable kind tag, as persisted on the wire.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateEvent { .. } => "createEvent",
            Self::CreateComment { .. } => "createComment",
            Self::RegisterForEvent { .. } => "registerForEvent",
        }
    }

    /// Short human-readable description, used in per-item notices.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::CreateEvent { draft } => format!("create event \"{}\"", draft.title),
            Self::CreateComment { event_id, .. } => format!("comment on event {event_id}"),
            Self::RegisterForEvent { event_id } => format!("registration for event {event_id}"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Queued envelope
// ─────────────────────────────────────────────────────────────────────────────

/// A queued offline action: the persisted envelope around [`OfflineAction`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedAction {
    /// Unique id, assigned at enqueue.
    pub id: Uuid,
    /// When the intent was captured.
    pub queued_at: DateTime<Utc>,
    /// The recorded intent.
    #[serde(flatten)]
    pub action: OfflineAction,
}

impl QueuedAction {
    /// Wrap an action in a fresh envelope.
    #[must_use]
    pub fn new(action: OfflineAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            queued_at: Utc::now(),
            action,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draft() -> EventDraft {
        EventDraft {
            title: "Open air jazz".into(),
            place: "Riverside park".into(),
            coordinates: None,
            starts_at: "2026-06-01T18:30:00Z".parse().unwrap(),
            category: "music".into(),
            description: String::new(),
            price_cents: 0,
            photo_path: None,
        }
    }

    // ── Wire format ───────────────────────────────────────────────────

    #[test]
    fn comment_serializes_as_kind_payload() {
        let action = OfflineAction::CreateComment {
            event_id: 42,
            text: "hi".into(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["kind"], "createComment");
        assert_eq!(json["payload"]["eventId"], 42);
        assert_eq!(json["payload"]["text"], "hi");
    }

    #[test]
    fn event_draft_omits_absent_coordinates() {
        let action = OfflineAction::CreateEvent {
            draft: sample_draft(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["kind"], "createEvent");
        assert!(json["payload"]["draft"].get("coordinates").is_none());
    }

    #[test]
    fn event_draft_keeps_captured_coordinates() {
        let mut draft = sample_draft();
        draft.coordinates = Some(Coordinates {
            latitude: 48.15,
            longitude: 17.11,
        });
        let json = serde_json::to_value(&OfflineAction::CreateEvent { draft }).unwrap();
        assert_eq!(json["payload"]["draft"]["coordinates"]["latitude"], 48.15);
    }

    #[test]
    fn queued_action_flattens_envelope() {
        let queued = QueuedAction::new(OfflineAction::RegisterForEvent { event_id: 7 });
        let json = serde_json::to_value(&queued).unwrap();
        assert!(json.get("id").is_some());
        assert!(json.get("queuedAt").is_some());
        assert_eq!(json["kind"], "registerForEvent");
        assert_eq!(json["payload"]["eventId"], 7);
    }

    #[test]
    fn queued_action_roundtrips() {
        let queued = QueuedAction::new(OfflineAction::CreateComment {
            event_id: 3,
            text: "see you there".into(),
        });
        let json = serde_json::to_string(&queued).unwrap();
        let back: QueuedAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, queued);
    }

    #[test]
    fn draft_defaults_apply_on_deserialize() {
        let json = serde_json::json!({
            "title": "Flea market",
            "place": "Old town square",
            "startsAt": "2026-07-10T09:00:00Z",
            "category": "market"
        });
        let draft: EventDraft = serde_json::from_value(json).unwrap();
        assert_eq!(draft.description, "");
        assert_eq!(draft.price_cents, 0);
        assert!(draft.coordinates.is_none());
        assert!(draft.photo_path.is_none());
    }

    // ── Kind tags ─────────────────────────────────────────────────────

    #[test]
    fn kind_matches_wire_tag() {
        let actions = [
            OfflineAction::CreateEvent {
                draft: sample_draft(),
            },
            OfflineAction::CreateComment {
                event_id: 1,
                text: "x".into(),
            },
            OfflineAction::RegisterForEvent { event_id: 1 },
        ];
        for action in actions {
            let json = serde_json::to_value(&action).unwrap();
            assert_eq!(json["kind"], action.kind());
        }
    }

    #[test]
    fn describe_names_the_target() {
        let action = OfflineAction::CreateComment {
            event_id: 42,
            text: "hi".into(),
        };
        assert!(action.describe().contains("42"));
    }
}
