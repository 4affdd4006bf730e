//! # gather-geo
//!
//! Geocoding client for the Gather offline action queue.
//!
//! Resolves a free-text place name to [`gather_core::Coordinates`] via an
//! external HTTP JSON geocoding API. The sync engine consumes the
//! [`GeoResolver`] trait so replay logic can be tested with doubles; the
//! real [`GeoClient`] performs a single attempt per call — retry policy,
//! if any, belongs to the caller.

#![deny(unsafe_code)]

pub mod client;
pub mod errors;

pub use client::{GeoClient, GeoConfig, GeoResolver};
pub use errors::{GeoError, Result};
