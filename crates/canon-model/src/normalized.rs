//! Normalization result for one batch.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::row::Row;
use crate::schema::SchemaCategory;

/// Which pipeline path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStatus {
    /// Rows were mapped onto a registered schema.
    Mapped,
    /// No schema is registered for the detected domain; rows are preserved as-is.
    PassThrough,
}

/// Batch-level metadata attached to a [`NormalizedData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationMetadata {
    pub total_records: usize,
    /// RFC 3339 UTC timestamp.
    pub normalized_at: String,
    /// `{schema_column: raw_column}`.
    pub column_mappings: Map<String, Value>,
    /// `{schema_column: similarity}` for each accepted mapping.
    pub column_scores: Map<String, Value>,
    pub unmapped_columns: Vec<String>,
    pub quality_score: f64,
    /// Display list: at most the configured number of messages plus a summary line.
    pub validation_errors: Vec<String>,
    /// Full number of validation errors, before truncation.
    pub validation_error_count: usize,
    /// Key columns that received at least one non-null value.
    pub detected_keys: Vec<String>,
}

/// Output of one normalization call. Produced once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedData {
    pub schema_type: String,
    pub schema_category: Option<SchemaCategory>,
    pub status: MappingStatus,
    pub original_columns: Vec<String>,
    pub mapped_data: Vec<Row>,
    pub metadata: NormalizationMetadata,
}

impl NormalizedData {
    pub fn is_pass_through(&self) -> bool {
        self.status == MappingStatus::PassThrough
    }

    pub fn quality_score(&self) -> f64 {
        self.metadata.quality_score
    }

    /// Raw column mapped to a schema column, if any.
    pub fn mapped_column(&self, schema_column: &str) -> Option<&str> {
        self.metadata
            .column_mappings
            .get(schema_column)
            .and_then(Value::as_str)
    }
}
