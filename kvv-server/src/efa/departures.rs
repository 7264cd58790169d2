//! Departure monitor normalization.

use serde_json::Value;

use crate::domain::{DepartureOptions, DepartureRecord, PlannedAccess, accessibility};

use super::fields::{first_text, hint_text, loose_int, one_or_many, text, verbatim};

/// The raw departure items in a departure monitor payload.
///
/// `departureList` is normally an array, but collapses to a single object
/// for one result and is sometimes wrapped as `{"departure": [...]}`.
pub fn departure_items(payload: &Value) -> Vec<&Value> {
    let Some(list) = payload.get("departureList") else {
        return Vec::new();
    };

    let list = match list.get("departure") {
        Some(inner) if list.is_object() => inner,
        _ => list,
    };

    one_or_many(list)
        .into_iter()
        .filter(|item| item.is_object())
        .collect()
}

/// Normalize every departure in a departure monitor payload.
pub fn normalize_departures(payload: &Value, options: DepartureOptions) -> Vec<DepartureRecord> {
    departure_items(payload)
        .into_iter()
        .map(|item| normalize_departure(item, options))
        .collect()
}

/// Normalize one raw departure item.
///
/// Never fails: missing or unparseable fields fall back to the defaults on
/// [`DepartureRecord`].
pub fn normalize_departure(item: &Value, options: DepartureOptions) -> DepartureRecord {
    let mut record = DepartureRecord::default();

    match item.get("servingLine").filter(|sl| sl.is_object()) {
        Some(serving_line) => apply_serving_line(&mut record, item, serving_line, options),
        None if options.delay => record.delay_minutes = Some(0),
        None => {}
    }

    if let Some(platform) = first_text(item, &["platform", "platformName"]) {
        record.platform = platform;
    }

    record.minutes_remaining = item.get("countdown").and_then(loose_int).unwrap_or(0);
    record.is_realtime = item.get("realDateTime").is_some();

    if options.detailed {
        let hints = hint_texts(item.get("hints"));
        if !hints.is_empty() {
            record.hints = Some(hints);
        }
    }

    record
}

fn apply_serving_line(
    record: &mut DepartureRecord,
    item: &Value,
    serving_line: &Value,
    options: DepartureOptions,
) {
    if let Some(line) = serving_line.get("number").and_then(text) {
        record.line = line;
    }
    if let Some(direction) = serving_line.get("direction").and_then(text) {
        record.direction = direction;
    }
    if let Some(mot) = serving_line.get("motType").and_then(loose_int) {
        record.mot = mot;
    }

    if options.delay
        && let Some(delay) = serving_line.get("delay")
    {
        record.delay_minutes = Some(loose_int(delay).unwrap_or(0));
    }

    if options.detailed {
        let access = accessibility::resolve(
            planned_access(item),
            hint_texts(serving_line.get("hints"))
                .iter()
                .map(String::as_str),
        );
        record.low_floor = Some(access.low_floor);
        record.wheelchair_accessible = Some(access.wheelchair_accessible);

        record.train_type = serving_line.get("trainType").and_then(verbatim);
        match serving_line.get("trainLength").and_then(verbatim) {
            Some(length) => record.train_length = Some(length),
            None => {
                record.train_composition =
                    serving_line.get("trainComposition").and_then(verbatim)
            }
        }
    }
}

/// Planning attributes from `attrs: [{"name": ..., "value": ...}]`.
fn planned_access(item: &Value) -> PlannedAccess {
    let mut planned = PlannedAccess::default();
    let Some(attrs) = item.get("attrs") else {
        return planned;
    };

    for attr in one_or_many(attrs) {
        let name = attr.get("name").and_then(verbatim).unwrap_or_default();
        let value = attr.get("value").and_then(verbatim).unwrap_or_default();
        planned.observe(&name, &value);
    }
    planned
}

/// Non-empty hint texts from a `hints` field.
fn hint_texts(hints: Option<&Value>) -> Vec<String> {
    hints
        .map(one_or_many)
        .unwrap_or_default()
        .into_iter()
        .filter_map(hint_text)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PLAIN: DepartureOptions = DepartureOptions {
        detailed: false,
        delay: false,
    };

    const DETAILED: DepartureOptions = DepartureOptions {
        detailed: true,
        delay: false,
    };

    const DELAY: DepartureOptions = DepartureOptions {
        detailed: false,
        delay: true,
    };

    #[test]
    fn tram_to_wolfartsweier() {
        let item = json!({
            "servingLine": {"number": "2", "direction": "Wolfartsweier", "motType": "4"},
            "platform": "4",
            "countdown": "0",
            "realDateTime": {"year": "2024", "hour": "12", "minute": "3"}
        });

        let value = serde_json::to_value(normalize_departure(&item, PLAIN)).unwrap();
        assert_eq!(
            value,
            json!({
                "line": "2",
                "direction": "Wolfartsweier",
                "mot": 4,
                "platform": "4",
                "minutes_remaining": 0,
                "is_realtime": true
            })
        );
    }

    #[test]
    fn empty_item_uses_defaults() {
        let record = normalize_departure(&json!({}), PLAIN);
        assert_eq!(record, DepartureRecord::default());
    }

    #[test]
    fn unparseable_numbers_default() {
        let item = json!({
            "servingLine": {"number": "S1", "motType": "tram"},
            "countdown": "bald"
        });
        let record = normalize_departure(&item, PLAIN);
        assert_eq!(record.mot, -1);
        assert_eq!(record.minutes_remaining, 0);
        assert_eq!(record.direction, "Unknown");
    }

    #[test]
    fn realtime_is_existence_only() {
        let item = json!({"realDateTime": null});
        assert!(normalize_departure(&item, PLAIN).is_realtime);
        assert!(!normalize_departure(&json!({"dateTime": {}}), PLAIN).is_realtime);
    }

    #[test]
    fn platform_fallbacks() {
        let item = json!({"platformName": "Gleis 3"});
        assert_eq!(normalize_departure(&item, PLAIN).platform, "Gleis 3");

        let item = json!({"platform": "1", "platformName": "Gleis 1"});
        assert_eq!(normalize_departure(&item, PLAIN).platform, "1");

        let item = json!({"platform": "", "platformName": "Gleis 1"});
        assert_eq!(normalize_departure(&item, PLAIN).platform, "Gleis 1");
    }

    #[test]
    fn delay_only_when_requested() {
        let item = json!({"servingLine": {"number": "5", "delay": "3"}});
        assert_eq!(normalize_departure(&item, PLAIN).delay_minutes, None);
        assert_eq!(normalize_departure(&item, DELAY).delay_minutes, Some(3));

        let garbled = json!({"servingLine": {"delay": "?"}});
        assert_eq!(normalize_departure(&garbled, DELAY).delay_minutes, Some(0));

        let absent = json!({"servingLine": {"number": "5"}});
        assert_eq!(normalize_departure(&absent, DELAY).delay_minutes, None);

        let no_line = json!({"platform": "1"});
        assert_eq!(normalize_departure(&no_line, DELAY).delay_minutes, Some(0));
    }

    #[test]
    fn detailed_accessibility_from_attrs() {
        let item = json!({
            "servingLine": {"number": "S5", "hints": [{"hint": "Rollstuhl"}]},
            "attrs": [
                {"name": "PlanLowFloorVehicle", "value": "1"},
                {"name": "PlanWheelchairAccess", "value": "0"}
            ]
        });
        let record = normalize_departure(&item, DETAILED);
        assert_eq!(record.low_floor, Some(true));
        assert_eq!(record.wheelchair_accessible, Some(true));
    }

    #[test]
    fn detailed_accessibility_from_hints() {
        let item = json!({
            "servingLine": {"number": "1", "hints": [
                {"hint": "Fahrzeug barrierefrei"},
                {"content": "Fahrradmitnahme"}
            ]}
        });
        let record = normalize_departure(&item, DETAILED);
        assert_eq!(record.low_floor, Some(false));
        assert_eq!(record.wheelchair_accessible, Some(true));
    }

    #[test]
    fn plain_request_has_no_details() {
        let item = json!({
            "servingLine": {"number": "1", "trainType": "ICE", "hints": [{"hint": "Niederflur"}]},
            "hints": [{"hint": "Ersatzverkehr"}]
        });
        let record = normalize_departure(&item, PLAIN);
        assert_eq!(record.low_floor, None);
        assert_eq!(record.train_type, None);
        assert_eq!(record.hints, None);
    }

    #[test]
    fn train_length_beats_composition() {
        let item = json!({"servingLine": {
            "trainType": "RE", "trainLength": "lang", "trainComposition": "2x ET"
        }});
        let record = normalize_departure(&item, DETAILED);
        assert_eq!(record.train_type.as_deref(), Some("RE"));
        assert_eq!(record.train_length.as_deref(), Some("lang"));
        assert_eq!(record.train_composition, None);

        let item = json!({"servingLine": {"trainComposition": "2x ET"}});
        let record = normalize_departure(&item, DETAILED);
        assert_eq!(record.train_length, None);
        assert_eq!(record.train_composition.as_deref(), Some("2x ET"));
    }

    #[test]
    fn departure_hints_skip_empty() {
        let item = json!({
            "hints": [{"hint": ""}, {"content": "Umleitung"}, {"hint": "Bauarbeiten"}]
        });
        let record = normalize_departure(&item, DETAILED);
        assert_eq!(
            record.hints,
            Some(vec!["Umleitung".to_string(), "Bauarbeiten".to_string()])
        );

        let item = json!({"hints": [{"hint": ""}]});
        assert_eq!(normalize_departure(&item, DETAILED).hints, None);
    }

    #[test]
    fn list_shapes() {
        let payload = json!({"departureList": [{"platform": "1"}, {"platform": "2"}]});
        assert_eq!(departure_items(&payload).len(), 2);

        let payload = json!({"departureList": {"platform": "1"}});
        assert_eq!(departure_items(&payload).len(), 1);

        let payload = json!({"departureList": {"departure": [{"platform": "1"}, {}]}});
        assert_eq!(departure_items(&payload).len(), 2);

        assert!(departure_items(&json!({"departureList": null})).is_empty());
        assert!(departure_items(&json!({"dm": {}})).is_empty());
    }

    #[test]
    fn normalized_batch_keeps_order() {
        let payload = json!({"departureList": [
            {"servingLine": {"number": "2"}, "countdown": 1},
            {"servingLine": {"number": "S1"}, "countdown": "5"},
            {"servingLine": {"number": "4"}, "countdown": 2.0}
        ]});
        let records = normalize_departures(&payload, PLAIN);
        let summary: Vec<_> = records
            .iter()
            .map(|r| (r.line.as_str(), r.minutes_remaining))
            .collect();
        assert_eq!(summary, vec![("2", 1), ("S1", 5), ("4", 2)]);
    }
}
