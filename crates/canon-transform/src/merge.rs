//! Folding of indexed keys (`tags[0]`, `tags[1]`, ...) into array fields.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use canon_model::{Row, is_missing};
use regex::Regex;
use serde_json::Value;

static INDEXED_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\[(\d+)\]$").expect("Invalid indexed key regex"));

/// Split `field[3]` into `("field", 3)`.
pub fn split_indexed_key(key: &str) -> Option<(&str, usize)> {
    let captures = INDEXED_KEY.captures(key)?;
    let base = captures.get(1)?.as_str();
    let index = captures.get(2)?.as_str().parse().ok()?;
    Some((base, index))
}

/// Fold indexed keys of one row into array fields.
///
/// Elements are ordered by numeric index and the indexed keys are removed.
/// An existing value under the base key is kept in front of the folded
/// elements. Rows without indexed keys are returned unchanged.
pub fn merge_indexed_fields(row: Row) -> Row {
    if !row.keys().any(|key| split_indexed_key(key).is_some()) {
        return row;
    }

    let mut groups: BTreeMap<String, Vec<(usize, Value)>> = BTreeMap::new();
    let mut first_seen: Vec<String> = Vec::new();
    let mut merged = Row::new();
    for (key, value) in row {
        match split_indexed_key(&key) {
            Some((base, index)) => {
                if !groups.contains_key(base) {
                    first_seen.push(base.to_string());
                }
                groups
                    .entry(base.to_string())
                    .or_default()
                    .push((index, value));
            }
            None => {
                merged.insert(key, value);
            }
        }
    }

    for base in first_seen {
        let Some(mut elements) = groups.remove(&base) else {
            continue;
        };
        elements.sort_by_key(|(index, _)| *index);
        let mut items = match merged.remove(&base) {
            Some(Value::Array(existing)) => existing,
            Some(existing) if !is_missing(&existing) => vec![existing],
            _ => Vec::new(),
        };
        items.extend(elements.into_iter().map(|(_, value)| value));
        merged.insert(base, Value::Array(items));
    }
    merged
}

/// Apply [`merge_indexed_fields`] to every row.
pub fn merge_rows(rows: Vec<Row>) -> Vec<Row> {
    rows.into_iter().map(merge_indexed_fields).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn folds_indexed_keys_in_index_order() {
        let merged = merge_indexed_fields(row(json!({
            "id": 1,
            "tags[10]": "c",
            "tags[2]": "b",
            "tags[0]": "a",
        })));
        assert_eq!(merged.get("tags"), Some(&json!(["a", "b", "c"])));
        assert!(!merged.contains_key("tags[0]"));
        assert_eq!(merged.get("id"), Some(&json!(1)));
    }

    #[test]
    fn keeps_existing_base_value_first() {
        let merged = merge_indexed_fields(row(json!({"tags": "x", "tags[0]": "y"})));
        assert_eq!(merged.get("tags"), Some(&json!(["x", "y"])));
    }

    #[test]
    fn non_indexed_brackets_are_untouched() {
        let merged = merge_indexed_fields(row(json!({"price[krw]": 1, "[0]": 2})));
        assert_eq!(merged.get("price[krw]"), Some(&json!(1)));
        assert_eq!(merged.get("[0]"), Some(&json!(2)));
    }

    #[test]
    fn splits_keys() {
        assert_eq!(split_indexed_key("readings[3]"), Some(("readings", 3)));
        assert_eq!(split_indexed_key("readings"), None);
    }
}
