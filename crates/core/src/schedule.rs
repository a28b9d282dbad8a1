//! Weekly-schedule primitives: weekday codes, time-of-day windows, and the
//! overlap predicate used by assignment conflict checking.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Weekday
// ---------------------------------------------------------------------------

/// Day-of-week codes as stored in `assignments.scheduled_days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "MON")]
    Mon,
    #[serde(rename = "TUE")]
    Tue,
    #[serde(rename = "WED")]
    Wed,
    #[serde(rename = "THU")]
    Thu,
    #[serde(rename = "FRI")]
    Fri,
    #[serde(rename = "SAT")]
    Sat,
    #[serde(rename = "SUN")]
    Sun,
}

/// All weekdays in MON..SUN order.
pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl Weekday {
    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Mon => "MON",
            Weekday::Tue => "TUE",
            Weekday::Wed => "WED",
            Weekday::Thu => "THU",
            Weekday::Fri => "FRI",
            Weekday::Sat => "SAT",
            Weekday::Sun => "SUN",
        }
    }

    /// Parse a stored weekday code. Case-insensitive.
    pub fn parse(code: &str) -> Result<Self, CoreError> {
        match code.to_ascii_uppercase().as_str() {
            "MON" => Ok(Weekday::Mon),
            "TUE" => Ok(Weekday::Tue),
            "WED" => Ok(Weekday::Wed),
            "THU" => Ok(Weekday::Thu),
            "FRI" => Ok(Weekday::Fri),
            "SAT" => Ok(Weekday::Sat),
            "SUN" => Ok(Weekday::Sun),
            other => Err(CoreError::Validation(format!(
                "Unknown weekday code: {other}"
            ))),
        }
    }

    pub fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
            chrono::Weekday::Sun => Weekday::Sun,
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a caller-supplied weekday set.
///
/// Rejects an empty set and unknown codes; collapses duplicates and returns
/// the days in MON..SUN order (order is irrelevant for storage, but a stable
/// order keeps listings deterministic).
pub fn normalize_days(codes: &[String]) -> Result<Vec<Weekday>, CoreError> {
    if codes.is_empty() {
        return Err(CoreError::Validation(
            "At least one scheduled day is required".to_string(),
        ));
    }

    let mut days = codes
        .iter()
        .map(|c| Weekday::parse(c))
        .collect::<Result<Vec<_>, _>>()?;
    days.sort();
    days.dedup();
    Ok(days)
}

// ---------------------------------------------------------------------------
// Time windows
// ---------------------------------------------------------------------------

/// Parse a time-of-day in `HH:MM` or `HH:MM:SS` form.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| CoreError::Validation(format!("Invalid time of day: {value}")))
}

/// Validate a same-day `[start, end)` window: end must be after start.
/// Overnight spans are not supported.
pub fn validate_window(start: NaiveTime, end: NaiveTime) -> Result<(), CoreError> {
    if end <= start {
        return Err(CoreError::Validation(
            "Schedule end must be after schedule start".to_string(),
        ));
    }
    Ok(())
}

/// Half-open interval overlap: `[a_start, a_end)` intersects
/// `[b_start, b_end)`. Windows that merely touch do not overlap.
pub fn windows_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Whether two weekday sets share at least one day.
pub fn days_overlap(a: &[Weekday], b: &[Weekday]) -> bool {
    a.iter().any(|day| b.contains(day))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
