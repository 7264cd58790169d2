//! KVV EFA (Elektronische Fahrplanauskunft) upstream.
//!
//! This module wraps the provider's stop finder and departure monitor and
//! turns their loosely-typed JSON into [`StopRecord`](crate::domain::StopRecord)
//! and [`DepartureRecord`](crate::domain::DepartureRecord) values.
//!
//! Things to know about EFA JSON:
//! - numbers arrive as strings, floats or integers depending on the field
//! - single-element lists often collapse to a bare object
//! - field names vary between EFA versions, so lookups go through aliases

mod client;
mod departures;
mod error;
mod fields;
mod stops;

pub use client::{DEFAULT_BASE_URL, EfaClient, EfaConfig, wildcard_query};
pub use departures::{departure_items, normalize_departure, normalize_departures};
pub use error::EfaError;
pub use stops::{
    StopListShape, StopRejected, locate_points, mot_codes, normalize_stops, parse_stop, rank,
    resolve_coordinates,
};
