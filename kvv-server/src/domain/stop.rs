//! Stop records.

use serde::Serialize;

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build a point, rejecting NaN and infinities.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite() && longitude.is_finite() {
            Some(Self {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }
}

/// A stop found by the stop finder.
///
/// Only constructed once `id`, `name` and coordinates have all been
/// resolved, so every `StopRecord` is safe to rank and to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRecord {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    /// Mode-of-transport codes in upstream order.
    pub mot_codes: Vec<i32>,
    pub coordinates: Coordinates,
    /// Upstream match quality, higher is better.
    pub match_quality: Option<i32>,
    pub is_best: Option<bool>,
}

impl StopRecord {
    pub fn latitude(&self) -> f64 {
        self.coordinates.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates.longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_reject_non_finite() {
        assert!(Coordinates::new(49.0, 8.4).is_some());
        assert!(Coordinates::new(f64::NAN, 8.4).is_none());
        assert!(Coordinates::new(49.0, f64::INFINITY).is_none());
    }
}
