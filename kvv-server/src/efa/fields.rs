//! Loose field access for EFA JSON.
//!
//! EFA encodes numbers as strings about half the time, omits fields instead
//! of sending null, and renames keys between versions. These helpers read a
//! value the way the provider might have sent it and return `None` instead
//! of failing.

use serde_json::Value;

use crate::domain::is_truthy;

/// Follow a dotted path such as `"ref.coords"`.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.get(key))
        .filter(|v| !v.is_null())
}

/// First alias that is present and not null.
pub fn first_present<'a>(value: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| get_path(value, alias))
}

/// Render a string or number as text. Empty strings count as missing.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First alias holding non-empty text.
pub fn first_text(value: &Value, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|alias| get_path(value, alias))
        .find_map(text)
}

/// Like [`text`], but keeps empty strings as they were sent.
pub fn verbatim(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse an integer from a JSON integer, float (truncated) or numeric string.
pub fn loose_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

fn truncate(f: f64) -> Option<i32> {
    if f.is_finite() && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f.trunc() as i32)
    } else {
        None
    }
}

/// Parse a float from a JSON number or numeric string.
pub fn loose_float(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    f.is_finite().then_some(f)
}

/// Parse a boolean from a JSON bool, integer (non-zero is true) or string.
pub fn loose_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => Some(is_truthy(s)),
        _ => None,
    }
}

/// View a value as a list: arrays yield their elements, anything else
/// (except null) yields itself.
pub fn one_or_many(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Hint text from an EFA hint object (`hint`, falling back to `content`)
/// or a bare string.
pub fn hint_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(_) => first_text(value, &["hint", "content"]),
        other => text(other),
    }
}
