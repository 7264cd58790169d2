//! Departure records and the options that shape them.

use serde::Serialize;

/// Default line label when the serving line has no number.
pub const UNKNOWN_LINE: &str = "?";

/// Default label for a missing direction or platform.
pub const UNKNOWN: &str = "Unknown";

/// Default MOT code when the upstream omits or garbles `motType`.
pub const UNKNOWN_MOT: i32 = -1;

/// Request options that change what a normalized departure contains.
///
/// Both flags are part of the cache key, since they change the cached value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DepartureOptions {
    /// Include accessibility, train and hint details.
    pub detailed: bool,
    /// Include `delay_minutes`.
    pub delay: bool,
}

impl DepartureOptions {
    pub fn new(detailed: bool, delay: bool) -> Self {
        Self { detailed, delay }
    }
}

/// A normalized departure.
///
/// The unconditional fields are always present in the JSON output; the
/// optional ones only appear when the request options and upstream data
/// provide them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartureRecord {
    pub line: String,
    pub direction: String,
    pub mot: i32,
    pub platform: String,
    pub minutes_remaining: i32,
    pub is_realtime: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_minutes: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_floor: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheelchair_accessible: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_length: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_composition: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<String>>,
}

impl Default for DepartureRecord {
    fn default() -> Self {
        Self {
            line: UNKNOWN_LINE.to_string(),
            direction: UNKNOWN.to_string(),
            mot: UNKNOWN_MOT,
            platform: UNKNOWN.to_string(),
            minutes_remaining: 0,
            is_realtime: false,
            delay_minutes: None,
            low_floor: None,
            wheelchair_accessible: None,
            train_type: None,
            train_length: None,
            train_composition: None,
            hints: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_record_serializes_required_fields_only() {
        let value = serde_json::to_value(DepartureRecord::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "line": "?",
                "direction": "Unknown",
                "mot": -1,
                "platform": "Unknown",
                "minutes_remaining": 0,
                "is_realtime": false
            })
        );
    }

    #[test]
    fn optional_fields_appear_when_set() {
        let record = DepartureRecord {
            delay_minutes: Some(3),
            low_floor: Some(true),
            wheelchair_accessible: Some(true),
            hints: Some(vec!["Bauarbeiten".into()]),
            ..Default::default()
        };
        let value = serde_json::to_value(record).unwrap();
        assert_eq!(value["delay_minutes"], 3);
        assert_eq!(value["low_floor"], true);
        assert_eq!(value["wheelchair_accessible"], true);
        assert_eq!(value["hints"], json!(["Bauarbeiten"]));
        assert!(value.get("train_type").is_none());
    }
}
