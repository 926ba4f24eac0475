//! Lenient timestamp parsing for values typed by people into spreadsheets.

use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;

use crate::error::CoreError;

/// Parse an RFC 3339 instant, a civil date-time (`2024-03-01 09:30:00` or
/// `2024-03-01T09:30`) or a plain date. Civil values are read as UTC.
pub fn parse_timestamp(value: &str) -> Result<Timestamp, CoreError> {
    let trimmed = value.trim();
    if let Ok(ts) = trimmed.parse::<Timestamp>() {
        return Ok(ts);
    }

    let normalized = trimmed.replacen(' ', "T", 1);
    let civil = normalized
        .parse::<DateTime>()
        .or_else(|_| trimmed.parse::<Date>().map(|d| d.to_datetime(jiff::civil::Time::midnight())));

    match civil {
        Ok(dt) => dt
            .to_zoned(TimeZone::UTC)
            .map(|z| z.timestamp())
            .map_err(|e| invalid(value, e)),
        Err(e) => Err(invalid(value, e)),
    }
}

/// Convert an Excel serial day number (1900 date system) to an instant.
pub fn from_excel_serial(serial: f64) -> Result<Timestamp, CoreError> {
    if !serial.is_finite() || serial < 0.0 {
        return Err(CoreError::InvalidTimestamp {
            value: serial.to_string(),
            reason: "not a valid spreadsheet date".to_string(),
        });
    }
    // Day zero of the 1900 system, shifted to absorb the phantom 1900-02-29.
    let epoch = Date::constant(1899, 12, 30)
        .to_datetime(jiff::civil::Time::midnight())
        .to_zoned(TimeZone::UTC)
        .map_err(|e| invalid(&serial.to_string(), e))?
        .timestamp();
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch
        .checked_add(jiff::SignedDuration::from_millis(millis))
        .map_err(|e| invalid(&serial.to_string(), e))
}

fn invalid(value: &str, err: jiff::Error) -> CoreError {
    CoreError::InvalidTimestamp {
        value: value.to_string(),
        reason: err.to_string(),
    }
}
