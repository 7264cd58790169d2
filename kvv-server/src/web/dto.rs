//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinates, DepartureOptions, StopRecord, is_truthy};

/// Query for `GET /api/stops/search`.
#[derive(Debug, Deserialize)]
pub struct StopSearchRequest {
    /// Free-text stop name (required)
    pub q: Option<String>,

    /// City passed upstream as a sort hint
    pub city: Option<String>,

    /// Include coordinates in the response when truthy
    pub location: Option<String>,
}

impl StopSearchRequest {
    pub fn include_location(&self) -> bool {
        self.location.as_deref().is_some_and(is_truthy)
    }
}

/// Query for `GET /api/stops/{stop_id}`.
#[derive(Debug, Default, Deserialize)]
pub struct DeparturesRequest {
    pub detailed: Option<String>,
    pub delay: Option<String>,

    /// Platform/track to narrow the results to
    pub track: Option<String>,
}

impl DeparturesRequest {
    pub fn options(&self) -> DepartureOptions {
        DepartureOptions {
            detailed: self.detailed.as_deref().is_some_and(is_truthy),
            delay: self.delay.as_deref().is_some_and(is_truthy),
        }
    }
}

/// A stop in search results.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub id: String,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_quality: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_best: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl StopResult {
    pub fn from_stop(stop: &StopRecord, include_location: bool) -> Self {
        Self {
            id: stop.id.clone(),
            name: stop.name.clone(),
            city: stop.city.clone(),
            match_quality: stop.match_quality,
            is_best: stop.is_best,
            coordinates: include_location.then_some(stop.coordinates),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,

    /// Upstream HTTP status, when one was received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stop() -> StopRecord {
        StopRecord {
            id: "7000090".into(),
            name: "Karlsruhe, Hauptbahnhof".into(),
            city: Some("Karlsruhe".into()),
            mot_codes: vec![1, 4],
            coordinates: Coordinates::new(48.9936, 8.40196).unwrap(),
            match_quality: Some(949),
            is_best: Some(true),
        }
    }

    #[test]
    fn stop_result_without_location() {
        let value = serde_json::to_value(StopResult::from_stop(&stop(), false)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "7000090",
                "name": "Karlsruhe, Hauptbahnhof",
                "city": "Karlsruhe",
                "match_quality": 949,
                "is_best": true
            })
        );
    }

    #[test]
    fn stop_result_with_location() {
        let value = serde_json::to_value(StopResult::from_stop(&stop(), true)).unwrap();
        assert_eq!(
            value["coordinates"],
            json!({"latitude": 48.9936, "longitude": 8.40196})
        );
    }

    #[test]
    fn departure_flags() {
        let req = DeparturesRequest {
            detailed: Some("TRUE".into()),
            delay: Some("0".into()),
            track: None,
        };
        assert_eq!(req.options(), DepartureOptions::new(true, false));
        assert_eq!(DeparturesRequest::default().options(), DepartureOptions::default());
    }

    #[test]
    fn error_code_omitted_when_unknown() {
        let body = ErrorResponse {
            error: "Invalid JSON from KVV".into(),
            code: None,
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"error": "Invalid JSON from KVV"})
        );
    }
}
