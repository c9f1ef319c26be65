//! Scalar normalization helpers used by the value converter.
//!
//! - **datetime**: date parsing, spreadsheet serials, ISO 8601 output
//! - **numeric**: number parsing and JSON number construction

pub mod datetime;
pub mod numeric;

pub use datetime::{
    date_part, format_iso8601_date, format_iso8601_datetime, from_serial, parse_date_text,
    ParsedDate,
};
pub use numeric::{number_value, parse_number, value_as_f64};
