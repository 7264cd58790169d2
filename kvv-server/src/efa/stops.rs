//! Stop finder normalization.
//!
//! The stop finder has answered with several envelope shapes over time:
//!
//! - a bare array of stop objects;
//! - `{"stopFinder": {"points": [...]}}`, where `points` may also be a
//!   single object or `{"point": ...}` when there is exactly one hit;
//! - a top-level `points`, `stops` or `locations` key.
//!
//! Each shape has its own parser, tried in order. Individual stops then go
//! through alias-based field resolution, and anything without an id, name
//! and coordinates is dropped.

use serde_json::Value;
use tracing::debug;

use crate::domain::{Coordinates, StopRecord};

use super::fields::{
    first_present, first_text, get_path, loose_bool, loose_float, loose_int, one_or_many,
};

const ID_ALIASES: &[&str] = &["stateless", "id", "stopID", "stopId", "ref.id"];
const NAME_ALIASES: &[&str] = &["name", "object", "nameWO"];
const CITY_ALIASES: &[&str] = &["place", "city", "locality", "mainLoc"];
const PARENT_ALIASES: &[&str] = &["ref", "parent", "locality"];
const PARENT_CITY_ALIASES: &[&str] = &["place", "city", "name"];
const MOT_ALIASES: &[&str] = &["modes", "mot", "productClasses", "motType"];
const MOT_ENTRY_ALIASES: &[&str] = &["type", "motType", "mot"];
const QUALITY_ALIASES: &[&str] = &["matchQuality", "matchquality", "match_quality", "quality"];
const BEST_ALIASES: &[&str] = &["isBest", "isbest", "is_best", "best"];
const COORD_CONTAINERS: &[&str] = &["coord", "coords", "coordinates", "ref.coords"];

/// Envelope shapes the stop finder is known to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopListShape {
    BareArray,
    StopFinderPoints,
    TopLevelKey(&'static str),
}

type ShapeParser = fn(&Value) -> Option<Vec<&Value>>;

const SHAPES: &[(StopListShape, ShapeParser)] = &[
    (StopListShape::BareArray, bare_array),
    (StopListShape::StopFinderPoints, stop_finder_points),
    (StopListShape::TopLevelKey("points"), top_level_points),
    (StopListShape::TopLevelKey("stops"), top_level_stops),
    (StopListShape::TopLevelKey("locations"), top_level_locations),
];

/// Why a raw stop object was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StopRejected {
    #[error("stop has no identifier")]
    MissingId,

    #[error("stop {0} has no name")]
    MissingName(String),

    #[error("stop {0} has no usable coordinates")]
    MissingCoordinates(String),
}

fn bare_array(payload: &Value) -> Option<Vec<&Value>> {
    payload.as_array().map(|items| items.iter().collect())
}

fn stop_finder_points(payload: &Value) -> Option<Vec<&Value>> {
    let points = get_path(payload, "stopFinder.points")?;
    match points {
        Value::Object(map) => match map.get("point") {
            Some(inner) => Some(one_or_many(inner)),
            None => Some(vec![points]),
        },
        Value::Array(items) => Some(items.iter().collect()),
        _ => None,
    }
}

fn top_level<'a>(payload: &'a Value, key: &str) -> Option<Vec<&'a Value>> {
    match payload.get(key)? {
        Value::Null => None,
        other => Some(one_or_many(other)),
    }
}

fn top_level_points(payload: &Value) -> Option<Vec<&Value>> {
    top_level(payload, "points")
}

fn top_level_stops(payload: &Value) -> Option<Vec<&Value>> {
    top_level(payload, "stops")
}

fn top_level_locations(payload: &Value) -> Option<Vec<&Value>> {
    top_level(payload, "locations")
}

/// Find the raw stop objects in a stop finder payload.
///
/// Returns `None` if no known shape matched.
pub fn locate_points(payload: &Value) -> Option<(StopListShape, Vec<&Value>)> {
    SHAPES.iter().find_map(|(shape, parse)| {
        parse(payload).map(|points| {
            let points = points.into_iter().filter(|p| p.is_object()).collect();
            (*shape, points)
        })
    })
}

/// Resolve coordinates from any of the known encodings.
///
/// Tried in order: the nested containers (`coord`, `coords`,
/// `coordinates`, `ref.coords`), then the stop object itself.
pub fn resolve_coordinates(raw: &Value) -> Option<Coordinates> {
    COORD_CONTAINERS
        .iter()
        .filter_map(|key| get_path(raw, key))
        .find_map(coordinates_in)
        .or_else(|| coordinate_keys(raw))
}

fn coordinates_in(container: &Value) -> Option<Coordinates> {
    match container {
        Value::Object(_) => coordinate_keys(container),
        Value::Array(pair) => coordinate_pair(pair),
        Value::String(s) => coordinate_string(s),
        _ => None,
    }
}

/// Key pairs in an object. The provider's `x`/`y` are latitude/longitude.
fn coordinate_keys(obj: &Value) -> Option<Coordinates> {
    let pairs = [("x", "y"), ("lat", "lon"), ("latitude", "longitude")];
    pairs.iter().find_map(|(lat_key, lon_key)| {
        let lat = obj.get(*lat_key).and_then(loose_float)?;
        let lon = obj.get(*lon_key).and_then(loose_float)?;
        Coordinates::new(lat, lon)
    })
}

/// `[lat, lon]`.
fn coordinate_pair(pair: &[Value]) -> Option<Coordinates> {
    match pair {
        [lat, lon] => Coordinates::new(loose_float(lat)?, loose_float(lon)?),
        _ => None,
    }
}

/// EFA's `WGS84[dd.ddddd]` output: `"lon,lat"`.
fn coordinate_string(s: &str) -> Option<Coordinates> {
    let (lon, lat) = s.split_once(',')?;
    let lon = lon.trim().parse::<f64>().ok()?;
    let lat = lat.trim().parse::<f64>().ok()?;
    Coordinates::new(lat, lon)
}

/// Collect MOT codes from whichever alias is present.
///
/// Accepts arrays or scalars of integers, numeric strings, comma-separated
/// strings (`"1,4,5"`) or objects with a `type` field. Unparseable entries
/// are skipped.
pub fn mot_codes(raw: &Value) -> Vec<i32> {
    let Some(field) = first_present(raw, MOT_ALIASES) else {
        return Vec::new();
    };

    one_or_many(field)
        .into_iter()
        .flat_map(|entry| -> Vec<i32> {
            match entry {
                Value::String(s) if s.contains(',') => s
                    .split(',')
                    .filter_map(|part| part.trim().parse::<i32>().ok())
                    .collect(),
                Value::Object(_) => first_present(entry, MOT_ENTRY_ALIASES)
                    .and_then(loose_int)
                    .into_iter()
                    .collect(),
                other => loose_int(other).into_iter().collect(),
            }
        })
        .collect()
}

fn city(raw: &Value) -> Option<String> {
    first_text(raw, CITY_ALIASES).or_else(|| {
        PARENT_ALIASES
            .iter()
            .filter_map(|key| raw.get(*key))
            .filter(|parent| parent.is_object())
            .find_map(|parent| first_text(parent, PARENT_CITY_ALIASES))
    })
}

/// Convert one raw stop object.
pub fn parse_stop(raw: &Value) -> Result<StopRecord, StopRejected> {
    let id = first_text(raw, ID_ALIASES).ok_or(StopRejected::MissingId)?;
    let name =
        first_text(raw, NAME_ALIASES).ok_or_else(|| StopRejected::MissingName(id.clone()))?;
    let coordinates =
        resolve_coordinates(raw).ok_or_else(|| StopRejected::MissingCoordinates(id.clone()))?;

    Ok(StopRecord {
        city: city(raw),
        mot_codes: mot_codes(raw),
        match_quality: first_present(raw, QUALITY_ALIASES).and_then(loose_int),
        is_best: first_present(raw, BEST_ALIASES).and_then(loose_bool),
        id,
        name,
        coordinates,
    })
}

/// Order stops by descending match quality and infer `is_best`.
///
/// The sort is stable, so stops with equal (or no) quality keep the
/// upstream order, which already honours the `anyResSort_sf` city hint.
/// Stops without a quality sort after those with one. If upstream marked
/// no stop as best, every stop sharing the top quality becomes best.
pub fn rank(stops: &mut [StopRecord]) {
    stops.sort_by(|a, b| b.match_quality.cmp(&a.match_quality));

    let any_marked = stops.iter().any(|s| s.is_best == Some(true));
    if any_marked {
        return;
    }

    if let Some(top) = stops.iter().filter_map(|s| s.match_quality).max() {
        for stop in stops.iter_mut() {
            stop.is_best = Some(stop.match_quality == Some(top));
        }
    }
}

/// Extract, validate and rank the stops in a stop finder payload.
pub fn normalize_stops(payload: &Value) -> Vec<StopRecord> {
    let Some((shape, points)) = locate_points(payload) else {
        debug!("stop finder payload matched no known shape");
        return Vec::new();
    };

    let mut stops: Vec<StopRecord> = points
        .into_iter()
        .filter_map(|raw| match parse_stop(raw) {
            Ok(stop) => Some(stop),
            Err(e) => {
                debug!(?shape, "skipping stop: {e}");
                None
            }
        })
        .collect();

    rank(&mut stops);
    stops
}
