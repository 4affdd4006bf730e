//! Error types for the geocoding client.

use thiserror::Error;

/// Errors that can occur while resolving a place name.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The provider returned no usable match for the place.
    ///
    /// Non-retryable: repeating the same query cannot succeed, so callers
    /// must drop the affected action rather than hammer the provider.
    #[error("no geocoding results for \"{place}\"")]
    NoResults {
        /// The place name that failed to resolve.
        place: String,
    },

    /// Transport-level failure (DNS, TLS, timeout, non-success status).
    #[error("geocoding request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a body we could not interpret.
    #[error("unexpected geocoding response: {reason}")]
    InvalidResponse {
        /// What was wrong with the response.
        reason: String,
    },
}

impl GeoError {
    /// Whether a later attempt could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Convenience alias for geocoding results.
pub type Result<T> = std::result::Result<T, GeoError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
