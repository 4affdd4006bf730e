//! One-shot user-facing notices.
//!
//! The sync engine reports each processed queue entry through a
//! [`NoticeSink`] — exactly one notice per entry, fire and forget. The
//! application shell renders these as toasts; the engine never awaits or
//! inspects delivery.

use serde::{Deserialize, Serialize};

/// Kind of a user-facing notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    /// The queued action was executed remotely.
    Success,
    /// The queued action failed and was reported to the user.
    Error,
}

/// A one-shot notification shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Success or error.
    pub kind: NoticeKind,
    /// Human-readable message.
    pub message: String,
}

impl Notice {
    /// Build a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// Build an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Fire-and-forget sink for user notices.
///
/// Implementations must not block and cannot fail the caller; a dropped
/// notice is a display problem, never a queue problem.
pub trait NoticeSink: Send + Sync {
    /// Deliver one notice.
    fn notify(&self, notice: Notice);
}

/// Default sink that writes notices to the log.
///
/// Useful in headless contexts and tests where no toast surface exists.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNoticeSink;

impl NoticeSink for TracingNoticeSink {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => tracing::info!(message = %notice.message, "notice"),
            NoticeKind::Error => tracing::warn!(message = %notice.message, "notice"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
