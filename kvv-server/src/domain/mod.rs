//! Domain types for the departures gateway.
//!
//! Canonical stop and departure records, plus the pure string heuristics
//! (track matching, accessibility keywords) that operate on them. Nothing
//! in here knows about the upstream JSON shapes.

pub mod accessibility;
mod departure;
mod stop;
pub mod track;

pub use accessibility::{Accessibility, PlannedAccess, is_truthy};
pub use departure::{DepartureOptions, DepartureRecord, UNKNOWN, UNKNOWN_LINE, UNKNOWN_MOT};
pub use stop::{Coordinates, StopRecord};
pub use track::{filter_by_track, matches_track};
