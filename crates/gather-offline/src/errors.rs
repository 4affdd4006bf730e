//! Error types for storage and settings.
//!
//! [`StorageError`] covers the durable key-value layer; per-entry replay
//! failures are *not* errors here — the synchronizer converts them into
//! user notices and a [`crate::sync::SyncReport`].

use thiserror::Error;

/// Errors from the durable key-value layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// JSON serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Convenience alias for storage results.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read.
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file contained invalid JSON.
    #[error("settings parse error: {0}")]
    Json(#[from] serde_json::Error),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_error_display() {
        let err = StorageError::Sqlite(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.to_string().contains("sqlite error"));
    }

    #[test]
    fn serde_error_display() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err = StorageError::Serde(serde_err);
        assert!(err.to_string().contains("serde error"));
    }

    #[test]
    fn from_rusqlite_error() {
        let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StorageError::Sqlite(_)));
    }

    #[test]
    fn settings_json_error_display() {
        let serde_err = serde_json::from_str::<String>("{").unwrap_err();
        let err = SettingsError::Json(serde_err);
        assert!(err.to_string().contains("settings parse error"));
    }
}
