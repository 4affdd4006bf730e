//! Layered engine configuration.
//!
//! Loading flow:
//! 1. Start with compiled [`OfflineSettings::default()`]
//! 2. If the settings file exists, deep-merge user values over defaults
//! 3. Apply `GATHER_*` environment overrides (highest priority)
//!
//! Deep merge rules: objects merge recursively (source wins per key),
//! arrays and primitives are replaced entirely, nulls in the source are
//! skipped. Invalid environment values are silently ignored and fall back
//! to the file/default value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::SettingsError;
use crate::sync::{DisconnectMode, FailureMode, SyncPolicy};

/// Resolve the default settings file path (`~/.gather/settings.json`).
#[must_use]
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".gather").join("settings.json")
}

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Durable storage settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSettings {
    /// Path of the `SQLite` database file.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home)
        .join(".gather")
        .join("offline.db")
        .display()
        .to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Geocoding provider settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoSettings {
    /// Base URL of the geocoding API.
    #[serde(default = "default_geo_base_url")]
    pub base_url: String,
    /// Provider API key.
    #[serde(default)]
    pub api_key: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_geo_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_geo_base_url() -> String {
    gather_geo::GeoConfig::default().base_url
}

fn default_geo_timeout_ms() -> u64 {
    gather_geo::client::DEFAULT_TIMEOUT_MS
}

impl Default for GeoSettings {
    fn default() -> Self {
        Self {
            base_url: default_geo_base_url(),
            api_key: String::new(),
            timeout_ms: default_geo_timeout_ms(),
        }
    }
}

impl GeoSettings {
    /// Build the client configuration for [`gather_geo::GeoClient`].
    #[must_use]
    pub fn client_config(&self) -> gather_geo::GeoConfig {
        gather_geo::GeoConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

/// Engine settings: storage, geocoding, and pass policy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineSettings {
    /// Durable storage.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Geocoding provider.
    #[serde(default)]
    pub geo: GeoSettings,
    /// Sync pass policy.
    #[serde(default)]
    pub sync: SyncPolicy,
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading
// ─────────────────────────────────────────────────────────────────────────────

impl OfflineSettings {
    /// Load from the default path with env overrides.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from_path(&settings_path())
    }

    /// Load from a specific path with env overrides.
    ///
    /// A missing file yields defaults; invalid JSON is an error.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        let defaults = serde_json::to_value(Self::default())?;

        let merged = if path.exists() {
            debug!(?path, "loading settings from file");
            let content = std::fs::read_to_string(path)?;
            let user: Value = serde_json::from_str(&content)?;
            deep_merge(defaults, user)
        } else {
            debug!(?path, "settings file not found, using defaults");
            defaults
        };

        let mut settings: Self = serde_json::from_value(merged)?;
        apply_env_overrides(&mut settings);
        Ok(settings)
    }
}

/// Recursive deep merge of two JSON values.
#[must_use]
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `GATHER_*` environment overrides from the process environment.
pub fn apply_env_overrides(settings: &mut OfflineSettings) {
    apply_env_overrides_from(settings, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary lookup (testable seam).
pub fn apply_env_overrides_from(
    settings: &mut OfflineSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = read_string(&lookup, "GATHER_DB_PATH") {
        settings.storage.db_path = v;
    }
    if let Some(v) = read_string(&lookup, "GATHER_GEO_BASE_URL") {
        settings.geo.base_url = v;
    }
    if let Some(v) = read_string(&lookup, "GATHER_GEO_API_KEY") {
        settings.geo.api_key = v;
    }
    if let Some(v) = read_u64(&lookup, "GATHER_GEO_TIMEOUT_MS", 100, 120_000) {
        settings.geo.timeout_ms = v;
    }
    if let Some(v) = read_failure_mode(&lookup, "GATHER_SYNC_FAILURE_MODE") {
        settings.sync.failure = v;
    }
    if let Some(v) = read_disconnect_mode(&lookup, "GATHER_SYNC_DISCONNECT_MODE") {
        settings.sync.disconnect = v;
    }
}

fn read_string(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|v| !v.is_empty())
}

fn read_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    min: u64,
    max: u64,
) -> Option<u64> {
    lookup(name)?
        .parse::<u64>()
        .ok()
        .filter(|v| (min..=max).contains(v))
}

fn read_failure_mode(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<FailureMode> {
    match lookup(name)?.as_str() {
        "dropAll" => Some(FailureMode::DropAll),
        "requeueTransient" => Some(FailureMode::RequeueTransient),
        _ => None,
    }
}

fn read_disconnect_mode(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<DisconnectMode> {
    match lookup(name)?.as_str() {
        "continuePass" => Some(DisconnectMode::ContinuePass),
        "abortAndRetain" => Some(DisconnectMode::AbortAndRetain),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
