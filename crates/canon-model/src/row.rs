//! Row representation.
//!
//! Rows are string-keyed JSON objects. Insertion order is preserved so the
//! first row's key order is the batch's raw header order.

use serde_json::{Map, Value};

/// A single record, raw or normalized.
pub type Row = Map<String, Value>;

/// Key under which each normalized row keeps a copy of its source row.
pub const ORIGINAL_KEY: &str = "_original";

/// Returns true for JSON null and for strings that are empty after trimming.
pub fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_values() {
        assert!(is_missing(&Value::Null));
        assert!(is_missing(&json!("   ")));
        assert!(!is_missing(&json!(0)));
        assert!(!is_missing(&json!(false)));
        assert!(!is_missing(&json!([])));
    }
}
