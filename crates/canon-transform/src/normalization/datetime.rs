//! Date parsing and ISO 8601 formatting.
//!
//! Spreadsheet exports often carry dates as serial day counts. Serials count
//! from 1900-01-01 as day 2 (the 1900 leap-year quirk), so
//! `date = 1900-01-01 + (serial - 2) days`.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Smallest number treated as a spreadsheet serial rather than a bare year
/// or small count.
pub const SERIAL_MIN: f64 = 1000.0;

/// Serial of 9999-12-31, the last day spreadsheets can represent.
pub const SERIAL_MAX: f64 = 2_958_465.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A parsed date, with or without a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl ParsedDate {
    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`.
    pub fn to_iso8601(&self) -> String {
        match self {
            ParsedDate::Date(d) => format_iso8601_date(*d),
            ParsedDate::DateTime(dt) => format_iso8601_datetime(*dt),
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            ParsedDate::Date(d) => *d,
            ParsedDate::DateTime(dt) => dt.date(),
        }
    }
}

/// Convert a spreadsheet serial to a date.
///
/// A fractional part becomes the time of day, rounded to the second.
/// Returns `None` for serials at or below [`SERIAL_MIN`] or past
/// [`SERIAL_MAX`].
pub fn from_serial(serial: f64) -> Option<ParsedDate> {
    if !serial.is_finite() || serial <= SERIAL_MIN || serial.trunc() > SERIAL_MAX {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1900, 1, 1)?;
    let whole = serial.trunc();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let days = (whole as u64).checked_sub(2)?;
    let mut date = epoch.checked_add_days(Days::new(days))?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mut seconds = ((serial - whole) * SECONDS_PER_DAY).round() as u32;
    if seconds == 0 {
        return Some(ParsedDate::Date(date));
    }
    if seconds >= 86_400 {
        date = date.checked_add_days(Days::new(1))?;
        seconds = 0;
    }
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)?;
    Some(ParsedDate::DateTime(date.and_time(time)))
}

/// Parse a date or datetime string.
///
/// Accepts RFC 3339, ISO 8601 with `T` or space separators, `YYYY/MM/DD`,
/// compact `YYYYMMDD`, `DD.MM.YYYY`, and `MM/DD/YYYY` (falling back to
/// `DD/MM/YYYY` when the first field cannot be a month).
pub fn parse_date_text(value: &str) -> Option<ParsedDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ParsedDate::DateTime(dt.naive_local()));
    }
    if let Some(dt) = try_parse_datetime(trimmed) {
        return Some(ParsedDate::DateTime(dt));
    }
    try_parse_date(trimmed).map(ParsedDate::Date)
}

fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%Y.%m.%d %H:%M:%S",
        "%d.%m.%Y %H:%M:%S",
        "%d.%m.%Y %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.with_nanosecond(0).unwrap_or(dt))
}

fn try_parse_date(value: &str) -> Option<NaiveDate> {
    // chrono's %Y accepts more than four digits, so compact dates are only
    // tried on exactly eight digits.
    if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(value, "%Y%m%d").ok();
    }

    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y.%m.%d",
        "%d.%m.%Y",
        "%m/%d/%Y",
        "%d/%m/%Y",
        "%d-%b-%Y",
        "%b %d, %Y",
        "%d %b %Y",
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Format a NaiveDateTime to ISO 8601 datetime string.
pub fn format_iso8601_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Format a NaiveDate to ISO 8601 date string.
pub fn format_iso8601_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The `YYYY-MM-DD` part of a date or datetime string.
pub fn date_part(value: &str) -> Option<String> {
    parse_date_text(value).map(|parsed| format_iso8601_date(parsed.date()))
}
