//! HTTP geocoding client and the [`GeoResolver`] seam.
//!
//! The wire contract mirrors the Google-style geocode endpoint the mobile
//! app already talks to: `GET {base}/geocode/json?address=...&key=...`
//! returning `{status, results: [{geometry: {location: {lat, lng}}}]}`.
//! Only the first result is used; ambiguity is the provider's problem.

use std::time::Duration;

use async_trait::async_trait;
use gather_core::Coordinates;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::{GeoError, Result};

/// Default request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Resolves a free-text place name to coordinates.
///
/// One external call per invocation, no retry at this layer.
#[async_trait]
pub trait GeoResolver: Send + Sync {
    /// Resolve `place` to coordinates.
    async fn resolve(&self, place: &str) -> Result<Coordinates>;
}

/// Configuration for [`GeoClient`].
#[derive(Clone, Debug)]
pub struct GeoConfig {
    /// Base URL of the geocoding API, without trailing slash.
    pub base_url: String,
    /// Provider API key, sent as the `key` query parameter.
    pub api_key: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            api_key: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Geocoding client over an external HTTP JSON API.
pub struct GeoClient {
    config: GeoConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl GeoClient {
    /// Build a client with a configured timeout.
    pub fn new(config: GeoConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl GeoResolver for GeoClient {
    async fn resolve(&self, place: &str) -> Result<Coordinates> {
        let url = format!("{}/geocode/json", self.config.base_url);
        debug!(place, "geocoding place name");

        let response = self
            .client
            .get(&url)
            .query(&[("address", place), ("key", self.config.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| GeoError::InvalidResponse {
                reason: e.to_string(),
            })?;

        match parsed.status.as_str() {
            "OK" => match parsed.results.first() {
                Some(first) => {
                    let location = &first.geometry.location;
                    debug!(
                        place,
                        latitude = location.lat,
                        longitude = location.lng,
                        "place resolved"
                    );
                    Ok(Coordinates {
                        latitude: location.lat,
                        longitude: location.lng,
                    })
                }
                None => Err(GeoError::NoResults {
                    place: place.to_string(),
                }),
            },
            "ZERO_RESULTS" => {
                warn!(place, "geocoder returned zero results");
                Err(GeoError::NoResults {
                    place: place.to_string(),
                })
            }
            other => Err(GeoError::InvalidResponse {
                reason: format!("provider status {other}"),
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
