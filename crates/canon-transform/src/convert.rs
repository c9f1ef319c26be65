//! Value coercion to a column's declared type.
//!
//! [`convert`] is total: it never fails or panics, and anything it cannot
//! coerce becomes `null`. Missing input (JSON null, empty or blank strings)
//! is always `null`.

use canon_model::{ColumnDescriptor, ColumnType, is_missing};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::normalization::{from_serial, number_value, parse_date_text, parse_number};

/// Lowercased spellings read as `true`; any other non-empty text is `false`.
const TRUTHY: &[&str] = &["true", "yes", "1", "y"];

/// Coerce a raw value to the column's type.
pub fn convert(raw: &Value, column: &ColumnDescriptor) -> Value {
    if is_missing(raw) {
        return Value::Null;
    }
    let converted = match column.column_type {
        ColumnType::String => to_string_value(raw),
        ColumnType::Number => to_number(raw),
        ColumnType::Date => to_date(raw),
        ColumnType::Boolean => to_boolean(raw),
        ColumnType::Enum => to_enum(raw, &column.enum_values),
        ColumnType::Array => to_array(raw),
        ColumnType::Object => to_object(raw),
        ColumnType::Geography => to_geography(raw),
    };
    if converted.is_null() {
        debug!(
            column = %column.name,
            column_type = %column.column_type,
            "value could not be converted"
        );
    }
    converted
}

/// Display text of a scalar; arrays and objects as compact JSON.
fn text_of(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn to_string_value(raw: &Value) -> Value {
    Value::String(text_of(raw))
}

fn to_number(raw: &Value) -> Value {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    };
    parsed.map_or(Value::Null, number_value)
}

fn to_date(raw: &Value) -> Value {
    let parsed = match raw {
        Value::Number(n) => n.as_f64().and_then(from_serial),
        Value::String(s) => parse_date_text(s).or_else(|| parse_number(s).and_then(from_serial)),
        _ => None,
    };
    parsed.map_or(Value::Null, |date| Value::String(date.to_iso8601()))
}

fn to_boolean(raw: &Value) -> Value {
    match raw {
        Value::Bool(b) => Value::Bool(*b),
        other => {
            let text = text_of(other).to_lowercase();
            Value::Bool(TRUTHY.contains(&text.as_str()))
        }
    }
}

fn to_enum(raw: &Value, allowed: &[String]) -> Value {
    if !matches!(raw, Value::String(_) | Value::Number(_) | Value::Bool(_)) {
        return Value::Null;
    }
    let text = text_of(raw).to_lowercase();
    allowed
        .iter()
        .find(|value| value.to_lowercase() == text)
        .or_else(|| {
            allowed.iter().find(|value| {
                let value = value.to_lowercase();
                text.contains(value.as_str()) || value.contains(text.as_str())
            })
        })
        .map_or(Value::Null, |value| Value::String(value.clone()))
}

fn to_array(raw: &Value) -> Value {
    match raw {
        Value::Array(_) => raw.clone(),
        Value::String(s) => match serde_json::from_str::<Value>(s.trim()) {
            Ok(parsed @ Value::Array(_)) => parsed,
            _ => Value::Array(vec![Value::String(s.trim().to_string())]),
        },
        other => Value::Array(vec![other.clone()]),
    }
}

fn to_object(raw: &Value) -> Value {
    match raw {
        Value::Object(_) => raw.clone(),
        Value::String(s) => match serde_json::from_str::<Value>(s.trim()) {
            Ok(parsed @ Value::Object(_)) => parsed,
            _ => raw_wrapper(raw),
        },
        other => raw_wrapper(other),
    }
}

fn to_geography(raw: &Value) -> Value {
    match raw {
        Value::Object(_) => raw.clone(),
        Value::String(s) => {
            if let Ok(parsed @ Value::Object(_)) = serde_json::from_str::<Value>(s.trim()) {
                return parsed;
            }
            let mut parts = s.split(',');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(lat), Some(lon), None) => {
                    lat_lon(parse_number(lat), parse_number(lon)).unwrap_or_else(|| raw_wrapper(raw))
                }
                _ => raw_wrapper(raw),
            }
        }
        Value::Array(items) if items.len() == 2 => {
            let as_f64 = |v: &Value| v.as_f64().or_else(|| v.as_str().and_then(parse_number));
            lat_lon(as_f64(&items[0]), as_f64(&items[1])).unwrap_or_else(|| raw_wrapper(raw))
        }
        other => raw_wrapper(other),
    }
}

fn lat_lon(lat: Option<f64>, lon: Option<f64>) -> Option<Value> {
    let (lat, lon) = (lat?, lon?);
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }
    Some(json!({ "lat": lat, "lon": lon }))
}

fn raw_wrapper(raw: &Value) -> Value {
    let mut wrapper = Map::new();
    wrapper.insert("raw".to_string(), raw.clone());
    Value::Object(wrapper)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(column_type: ColumnType) -> ColumnDescriptor {
        ColumnDescriptor::new("field", column_type)
    }

    #[test]
    fn missing_values_become_null() {
        for column_type in [ColumnType::String, ColumnType::Number, ColumnType::Object] {
            assert_eq!(convert(&json!(null), &column(column_type)), Value::Null);
            assert_eq!(convert(&json!("   "), &column(column_type)), Value::Null);
        }
    }

    #[test]
    fn strings_stringify_scalars() {
        let col = column(ColumnType::String);
        assert_eq!(convert(&json!(" abc "), &col), json!("abc"));
        assert_eq!(convert(&json!(42), &col), json!("42"));
        assert_eq!(convert(&json!(true), &col), json!("true"));
    }

    #[test]
    fn numbers_parse_text() {
        let col = column(ColumnType::Number);
        assert_eq!(convert(&json!("1,200"), &col), json!(1200));
        assert_eq!(convert(&json!("12.5"), &col), json!(12.5));
        assert_eq!(convert(&json!(3.0), &col), json!(3));
        assert_eq!(convert(&json!("twelve"), &col), Value::Null);
        assert_eq!(convert(&json!([1]), &col), Value::Null);
    }

    #[test]
    fn dates_accept_serials_and_text() {
        let col = column(ColumnType::Date);
        assert_eq!(convert(&json!(45819), &col), json!("2025-06-11"));
        assert_eq!(convert(&json!("45819"), &col), json!("2025-06-11"));
        assert_eq!(convert(&json!("2025/06/11"), &col), json!("2025-06-11"));
        assert_eq!(convert(&json!(12), &col), Value::Null);
        assert_eq!(convert(&json!("not a date"), &col), Value::Null);
    }

    #[test]
    fn booleans_use_truthy_set() {
        let col = column(ColumnType::Boolean);
        assert_eq!(convert(&json!("Yes"), &col), json!(true));
        assert_eq!(convert(&json!("Y"), &col), json!(true));
        assert_eq!(convert(&json!(1), &col), json!(true));
        assert_eq!(convert(&json!("no"), &col), json!(false));
        assert_eq!(convert(&json!("maybe"), &col), json!(false));
        assert_eq!(convert(&json!(false), &col), json!(false));
    }

    #[test]
    fn enums_match_exact_then_containment() {
        let col = column(ColumnType::Enum).with_enum_values(&["cash", "card", "mobile"]);
        assert_eq!(convert(&json!("CARD"), &col), json!("card"));
        assert_eq!(convert(&json!("credit card"), &col), json!("card"));
        assert_eq!(convert(&json!("bitcoin"), &col), Value::Null);
    }

    #[test]
    fn enum_without_values_is_null() {
        let col = column(ColumnType::Enum);
        assert_eq!(convert(&json!("Online"), &col), Value::Null);
        assert_eq!(convert(&json!(3), &col), Value::Null);
    }

    #[test]
    fn arrays_wrap_scalars() {
        let col = column(ColumnType::Array);
        assert_eq!(convert(&json!([1, 2]), &col), json!([1, 2]));
        assert_eq!(convert(&json!("red"), &col), json!(["red"]));
        assert_eq!(convert(&json!("[\"a\",\"b\"]"), &col), json!(["a", "b"]));
        assert_eq!(convert(&json!(7), &col), json!([7]));
    }

    #[test]
    fn objects_parse_or_wrap() {
        let col = column(ColumnType::Object);
        assert_eq!(convert(&json!({"a": 1}), &col), json!({"a": 1}));
        assert_eq!(convert(&json!("{\"a\": 1}"), &col), json!({"a": 1}));
        assert_eq!(convert(&json!("plain"), &col), json!({"raw": "plain"}));
    }

    #[test]
    fn geography_reads_lat_lon_pairs() {
        let col = column(ColumnType::Geography);
        assert_eq!(
            convert(&json!("37.5665, 126.978"), &col),
            json!({"lat": 37.5665, "lon": 126.978})
        );
        assert_eq!(
            convert(&json!({"lat": 1.0, "lon": 2.0}), &col),
            json!({"lat": 1.0, "lon": 2.0})
        );
        assert_eq!(convert(&json!("Seoul"), &col), json!({"raw": "Seoul"}));
        assert_eq!(convert(&json!("95,10"), &col), json!({"raw": "95,10"}));
    }
}
