//! Accessibility heuristics.
//!
//! The departure monitor reports accessibility in two ways: explicit
//! planning attributes (`planLowFloorVehicle`, `planWheelchairAccess`) and
//! free-text hints on the serving line. Explicit attributes win; hints are
//! only consulted for a signal whose attribute is missing.

/// Attribute name carrying the planned low-floor flag.
pub const PLAN_LOW_FLOOR_ATTR: &str = "planLowFloorVehicle";

/// Attribute name carrying the planned wheelchair-access flag.
pub const PLAN_WHEELCHAIR_ATTR: &str = "planWheelchairAccess";

const LOW_FLOOR_KEYWORDS: &[&str] = &["Niederflur", "low floor", "lowFloor"];

const WHEELCHAIR_KEYWORDS: &[&str] = &["Rollstuhl", "wheelchair", "barrierefrei", "barrier-free"];

/// Resolved accessibility of one departure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accessibility {
    pub low_floor: bool,
    /// Also true for any low-floor vehicle.
    pub wheelchair_accessible: bool,
}

/// Explicit planning attributes; `None` means the attribute was absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlannedAccess {
    pub low_floor: Option<bool>,
    pub wheelchair: Option<bool>,
}

impl PlannedAccess {
    /// Record one `(name, value)` attribute if it is a planning attribute.
    ///
    /// Names compare case-insensitively. A later duplicate overrides an
    /// earlier one.
    pub fn observe(&mut self, name: &str, value: &str) {
        if name.eq_ignore_ascii_case(PLAN_LOW_FLOOR_ATTR) {
            self.low_floor = Some(is_truthy(value));
        } else if name.eq_ignore_ascii_case(PLAN_WHEELCHAIR_ATTR) {
            self.wheelchair = Some(is_truthy(value));
        }
    }
}

/// `"1"`, `"true"` and `"yes"` (any case) are true; everything else is false.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}

/// Whether a hint text mentions a low-floor vehicle. Case-sensitive.
pub fn mentions_low_floor(text: &str) -> bool {
    LOW_FLOOR_KEYWORDS.iter().any(|k| text.contains(k))
}

/// Whether a hint text mentions wheelchair access. Case-sensitive.
pub fn mentions_wheelchair(text: &str) -> bool {
    WHEELCHAIR_KEYWORDS.iter().any(|k| text.contains(k))
}

/// Combine explicit attributes with serving-line hint texts.
pub fn resolve<'a, I>(planned: PlannedAccess, hints: I) -> Accessibility
where
    I: IntoIterator<Item = &'a str>,
{
    let mut hint_low_floor = false;
    let mut hint_wheelchair = false;
    for text in hints {
        hint_low_floor |= mentions_low_floor(text);
        hint_wheelchair |= mentions_wheelchair(text);
    }

    let low_floor = planned.low_floor.unwrap_or(hint_low_floor);
    let wheelchair = planned.wheelchair.unwrap_or(hint_wheelchair);

    Accessibility {
        low_floor,
        wheelchair_accessible: wheelchair || low_floor,
    }
}
