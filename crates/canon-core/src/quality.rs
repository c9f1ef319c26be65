//! Batch quality score.

use canon_model::{ColumnMapping, SchemaDescriptor};

/// Score reported for batches preserved without a schema.
pub const PASS_THROUGH_QUALITY: f64 = 0.5;

/// Share of required-or-key columns that received a mapping.
///
/// A schema without required or key columns is fully covered.
pub fn coverage(schema: &SchemaDescriptor, mapping: &ColumnMapping) -> f64 {
    let total = schema.required_or_key_columns().count();
    if total == 0 {
        return 1.0;
    }
    let covered = schema
        .required_or_key_columns()
        .filter(|column| mapping.raw_for(&column.name).is_some())
        .count();
    covered as f64 / total as f64
}

/// `coverage × (1 − rows_with_errors / total_rows)`, clamped to `[0, 1]`.
///
/// An empty batch scores `0`.
pub fn quality_score(
    schema: &SchemaDescriptor,
    mapping: &ColumnMapping,
    rows_with_errors: usize,
    total_rows: usize,
) -> f64 {
    if total_rows == 0 {
        return 0.0;
    }
    let error_rate = rows_with_errors.min(total_rows) as f64 / total_rows as f64;
    (coverage(schema, mapping) * (1.0 - error_rate)).clamp(0.0, 1.0)
}
