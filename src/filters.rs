//! Query filter expressions.
//!
//! Parses the free-form `--magnitude`, `--time` and event-id inputs accepted
//! by the FDSN subcommands into validated query parameter values.

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat};

use crate::errors::GeteqError;

/// Separators accepted between the two ends of a magnitude range.
///
/// Checked in order: an input such as `4.0,6.0-1` is split on the comma.
/// A separator that appears more than once (`4-5-6`, `1,2,3`) is rejected.
const RANGE_SEPARATORS: [char; 2] = [',', '-'];

/// Layout of a bare date instant.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of a bare `YYYY-MM-DD` date.
const DATE_LEN: usize = 10;

/// Characters that never appear in a catalogue event id.
const DISALLOWED_ID_CHARS: &[char] = &[
    '"', '\'', '`', '&', '*', '?', '{', '}', '[', ']', '(', ')', '|', '~', '^', '<', '>', ';',
    '$', '!', '#', '%', '=', '+', '\\', '/', '@', ',', ':',
];

/// Magnitude constraint parsed from `--magnitude`.
///
/// Bounds are kept verbatim and forwarded to the upstream service, which
/// does its own numeric validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MagnitudeSpec {
    pub lower: Option<String>,
    pub upper: Option<String>,
}

impl MagnitudeSpec {
    /// True when no bound is set (empty input).
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// Build from two raw ends, returning `None` if both are blank.
    fn bounded(lower: &str, upper: &str) -> Option<Self> {
        let parsed = Self {
            lower: non_blank(lower),
            upper: non_blank(upper),
        };
        (!parsed.is_unbounded()).then_some(parsed)
    }
}

impl std::str::FromStr for MagnitudeSpec {
    type Err = GeteqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }

        let invalid = || GeteqError::InvalidMagnitude(s.to_string());

        if raw.chars().any(char::is_alphabetic) {
            return Err(invalid());
        }

        for sep in RANGE_SEPARATORS {
            match raw.matches(sep).count() {
                0 => {}
                1 => {
                    let (lower, upper) = raw.split_once(sep).ok_or_else(invalid)?;
                    return Self::bounded(lower, upper).ok_or_else(invalid);
                }
                _ => return Err(invalid()),
            }
        }

        if let Some(lower) = raw.strip_prefix('>') {
            return Self::bounded(lower, "").ok_or_else(invalid);
        }

        if let Some(upper) = raw.strip_prefix('<') {
            return Self::bounded("", upper).ok_or_else(invalid);
        }

        if raw.chars().any(|c| c.is_ascii_digit()) {
            return Ok(Self {
                lower: Some(raw.to_string()),
                upper: Some(raw.to_string()),
            });
        }

        Err(invalid())
    }
}

/// Time window parsed from `--time` as `START,END`.
///
/// No ordering check is made between the two instants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeRangeSpec {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl std::str::FromStr for TimeRangeSpec {
    type Err = GeteqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }

        let invalid = || GeteqError::InvalidTimeRange(s.to_string());

        let (start, end) = raw.split_once(',').ok_or_else(invalid)?;
        if end.contains(',') {
            return Err(invalid());
        }

        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() && end.is_empty() {
            return Ok(Self::default());
        }

        let start = parse_instant(start).map_err(|_| invalid())?;
        let end = parse_instant(end).map_err(|_| invalid())?;

        Ok(Self {
            start: Some(start),
            end: Some(end),
        })
    }
}

/// Normalize a single instant to either RFC 3339 or `YYYY-MM-DD`.
///
/// A timestamp with seconds but no offset is taken as UTC.
///
/// # Errors
///
/// Returns [`GeteqError::InvalidTimeRange`] if the input is neither form.
pub fn parse_instant(raw: &str) -> Result<String, GeteqError> {
    let mut candidate = raw.to_string();
    if lacks_utc_marker(raw) {
        candidate.push('Z');
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(&candidate) {
        return Ok(ts.to_rfc3339_opts(SecondsFormat::Secs, true));
    }

    if is_plain_date(raw) {
        if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            return Ok(date.format(DATE_FORMAT).to_string());
        }
    }

    Err(GeteqError::InvalidTimeRange(raw.to_string()))
}

fn lacks_utc_marker(s: &str) -> bool {
    s.matches(':').count() == 2 && s.matches('T').count() == 1 && !s.ends_with('Z')
}

fn is_plain_date(s: &str) -> bool {
    s.len() == DATE_LEN
        && s.get(..4)
            .is_some_and(|year| year.bytes().all(|b| b.is_ascii_digit()))
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Identifier of a single event in the FDSN catalogue (e.g. `ci40012345`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventId(String);

impl EventId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for EventId {
    type Err = GeteqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        if id.is_empty()
            || id.contains(DISALLOWED_ID_CHARS)
            || id.chars().any(char::is_whitespace)
        {
            return Err(GeteqError::InvalidEventId(s.to_string()));
        }
        Ok(Self(id.to_string()))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
