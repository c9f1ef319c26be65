//! Schema-column to raw-column mapping.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mapping produced by the column matcher for one batch.
///
/// Entries are kept in schema declaration order. The mapping is injective:
/// a raw column appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    entries: Vec<MappedColumn>,
    /// Raw columns that were not assigned to any schema column.
    pub unmapped_columns: Vec<String>,
}

/// A single accepted assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedColumn {
    pub schema_column: String,
    pub raw_column: String,
    /// Similarity in `[0, 1]` that won the assignment.
    pub score: f64,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an assignment.
    ///
    /// Returns false (and records nothing) if either side is already used.
    pub fn insert(
        &mut self,
        schema_column: impl Into<String>,
        raw_column: impl Into<String>,
        score: f64,
    ) -> bool {
        let schema_column = schema_column.into();
        let raw_column = raw_column.into();
        if self.raw_for(&schema_column).is_some() || self.schema_for(&raw_column).is_some() {
            return false;
        }
        self.entries.push(MappedColumn {
            schema_column,
            raw_column,
            score: score.clamp(0.0, 1.0),
        });
        true
    }

    /// Raw column assigned to a schema column.
    pub fn raw_for(&self, schema_column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.schema_column == schema_column)
            .map(|entry| entry.raw_column.as_str())
    }

    /// Schema column a raw column was assigned to.
    pub fn schema_for(&self, raw_column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.raw_column == raw_column)
            .map(|entry| entry.schema_column.as_str())
    }

    pub fn score_for(&self, schema_column: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.schema_column == schema_column)
            .map(|entry| entry.score)
    }

    pub fn entries(&self) -> &[MappedColumn] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reorder entries to follow the given schema column order.
    pub fn sort_by_schema_order<'a>(&mut self, order: impl IntoIterator<Item = &'a str>) {
        let order: Vec<&str> = order.into_iter().collect();
        self.entries.sort_by_key(|entry| {
            order
                .iter()
                .position(|name| *name == entry.schema_column)
                .unwrap_or(usize::MAX)
        });
    }

    /// True when no raw column is assigned twice.
    pub fn is_injective(&self) -> bool {
        let mut seen = BTreeSet::new();
        self.entries
            .iter()
            .all(|entry| seen.insert(entry.raw_column.as_str()))
    }

    /// `{schema_column: raw_column}` as a JSON object.
    pub fn to_json_map(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|entry| {
                (
                    entry.schema_column.clone(),
                    Value::String(entry.raw_column.clone()),
                )
            })
            .collect()
    }

    /// `{schema_column: score}` as a JSON object.
    pub fn scores_json_map(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|entry| (entry.schema_column.clone(), Value::from(entry.score)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_reused_raw_column() {
        let mut mapping = ColumnMapping::new();
        assert!(mapping.insert("customer_id", "cust", 0.9));
        assert!(!mapping.insert("customer_name", "cust", 0.5));
        assert!(!mapping.insert("customer_id", "other", 0.5));
        assert_eq!(mapping.len(), 1);
        assert!(mapping.is_injective());
    }

    #[test]
    fn sorts_by_schema_order() {
        let mut mapping = ColumnMapping::new();
        mapping.insert("b", "x", 1.0);
        mapping.insert("a", "y", 1.0);
        mapping.sort_by_schema_order(["a", "b"]);
        let names: Vec<_> = mapping
            .entries()
            .iter()
            .map(|e| e.schema_column.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(mapping.to_json_map()["a"], Value::String("y".into()));
    }
}
