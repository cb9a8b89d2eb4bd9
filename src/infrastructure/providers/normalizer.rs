//! # Result Normalizer Helpers
//!
//! Field-level conversions shared by provider adapters when turning wire
//! offers into canonical [`Offer`](crate::domain::entities::Offer)s.
//!
//! Merging and sorting across providers happens in
//! [`ranking`](crate::application::services::ranking).

use crate::domain::entities::NOT_AVAILABLE;
use crate::domain::value_objects::{AirportCode, CabinClass};
use crate::infrastructure::providers::error::ProtocolError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Parses a provider timestamp.
///
/// Accepts RFC 3339 (the offset is dropped, keeping airport-local time) and
/// offset-less ISO 8601 date-times.
///
/// # Errors
///
/// Returns `ProtocolError` naming `field` if no format matches.
pub fn parse_date_time(value: &str, field: &str) -> Result<NaiveDateTime, ProtocolError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| ProtocolError::new(format!("{field}: unparseable timestamp '{value}'")))
}

/// Parses an airport code from a response.
///
/// # Errors
///
/// Returns `ProtocolError` naming `field` if the code is malformed.
pub fn airport(code: &str, field: &str) -> Result<AirportCode, ProtocolError> {
    AirportCode::new(code).map_err(|e| ProtocolError::new(format!("{field}: {e}")))
}

/// Joins carrier code and number, e.g. `BG` + `147` gives `BG147`.
#[must_use]
pub fn flight_number(carrier_code: &str, number: &str) -> String {
    format!("{}{}", carrier_code.trim(), number.trim())
}

/// Returns the text, or `"N/A"` when missing or blank.
#[must_use]
pub fn text_or_not_available(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Maps a provider cabin label to a cabin class, falling back to economy.
#[must_use]
pub fn cabin_or_economy(value: Option<&str>) -> CabinClass {
    value
        .and_then(|v| v.parse::<CabinClass>().ok())
        .unwrap_or_default()
}

/// Formats a date the way provider search bodies expect it.
#[must_use]
pub fn wire_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
