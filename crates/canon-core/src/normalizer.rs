//! The normalization pipeline.
//!
//! Rows flow through: indexed-key merge → domain detection → schema lookup →
//! column matching → per-row conversion and derivation → constraint
//! validation → quality scoring. Nothing in the pipeline fails; problems are
//! reported as validation messages and reflected in the quality score.

use canon_map::ColumnMatcher;
use canon_model::{
    ColumnMapping, MappingStatus, NormalizationMetadata, NormalizedData, ORIGINAL_KEY, Row,
    SchemaDescriptor, is_missing,
};
use canon_standards::{DomainDetector, Lexicon, SchemaRegistry};
use canon_transform::{DeriveContext, convert, derive_row, merge_rows};
use canon_validate::{Issue, RowValidator, display_messages, rows_with_issues};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info, trace};

use crate::options::NormalizeOptions;
use crate::quality::{PASS_THROUGH_QUALITY, coverage, quality_score};

/// How a batch will be processed once its domain is known.
#[derive(Debug, Clone, Copy)]
pub enum Plan<'s> {
    /// Map onto a registered schema.
    Mapped(&'s SchemaDescriptor),
    /// No schema is registered for the domain; keep rows as they are.
    PassThrough,
}

/// Normalizes batches of rows against a schema registry.
///
/// Holds only shared references to immutable catalogs, so one normalizer can
/// serve concurrent calls from many threads.
///
/// # Example
///
/// ```ignore
/// let registry = SchemaRegistry::load_embedded()?;
/// let lexicon = Lexicon::load_embedded()?;
/// let normalizer = Normalizer::new(&registry, &lexicon);
/// let result = normalizer.normalize(&rows, "2024_매출_export.xlsx");
/// assert_eq!(result.schema_type, "sales_fact");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    registry: &'a SchemaRegistry,
    lexicon: &'a Lexicon,
    options: NormalizeOptions,
}

impl<'a> Normalizer<'a> {
    pub fn new(registry: &'a SchemaRegistry, lexicon: &'a Lexicon) -> Self {
        Self {
            registry,
            lexicon,
            options: NormalizeOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Resolve a label to a domain type and processing plan.
    pub fn plan(&self, label: &str) -> (String, Plan<'a>) {
        let domain = DomainDetector::new(self.lexicon)
            .with_registry(self.registry)
            .detect(label);
        let plan = match self.registry.lookup(&domain) {
            Some(schema) => Plan::Mapped(schema),
            None => Plan::PassThrough,
        };
        (domain, plan)
    }

    /// Normalize a batch, stamping it with the current time.
    pub fn normalize(&self, rows: &[Row], label: &str) -> NormalizedData {
        self.normalize_at(rows, label, Utc::now())
    }

    /// Normalize a batch with a caller-supplied clock.
    ///
    /// `now` stamps `normalized_at` and the `valid_from` default of
    /// dimension rows.
    pub fn normalize_at(&self, rows: &[Row], label: &str, now: DateTime<Utc>) -> NormalizedData {
        let (domain, plan) = self.plan(label);
        let normalized_at = now.to_rfc3339_opts(SecondsFormat::Secs, true);

        if rows.is_empty() {
            info!(label, domain = %domain, "empty batch");
            return empty_result(domain, plan, normalized_at);
        }

        let rows = merge_rows(rows.to_vec());
        let original_columns = header_of(&rows);

        match plan {
            Plan::PassThrough => {
                info!(
                    label,
                    domain = %domain,
                    rows = rows.len(),
                    "no schema registered, passing rows through"
                );
                pass_through(domain, original_columns, rows, normalized_at)
            }
            Plan::Mapped(schema) => {
                info!(label, schema = %schema.schema_type, rows = rows.len(), "schema selected");
                self.map_rows(schema, original_columns, rows, now, normalized_at)
            }
        }
    }

    fn map_rows(
        &self,
        schema: &SchemaDescriptor,
        original_columns: Vec<String>,
        rows: Vec<Row>,
        now: DateTime<Utc>,
        normalized_at: String,
    ) -> NormalizedData {
        let matcher = ColumnMatcher::new(self.lexicon, self.options.matching);
        let mapping = matcher.match_columns(&original_columns, schema);
        info!(
            schema = %schema.schema_type,
            mapped = mapping.len(),
            unmapped = mapping.unmapped_columns.len(),
            coverage = coverage(schema, &mapping),
            "columns matched"
        );

        let mut issues: Vec<Issue> = schema
            .columns
            .iter()
            .filter(|column| column.required && mapping.raw_for(&column.name).is_none())
            .map(|column| Issue::RequiredUnmapped {
                field: column.name.clone(),
            })
            .collect();
        for issue in &issues {
            debug!(field = issue.field(), "required column unmapped");
        }

        let validator = RowValidator::new(schema);
        let naive_now = now.naive_utc();
        let total_records = rows.len();
        let mut mapped_data = Vec::with_capacity(total_records);

        for (row_index, raw) in rows.into_iter().enumerate() {
            let mut row = convert_row(&raw, schema, &mapping);
            let original = back_reference(raw);
            let context = DeriveContext {
                row_index,
                original: &original,
                now: naive_now,
                revenue_tolerance: self.options.revenue_tolerance,
            };
            for mismatch in derive_row(&mut row, schema, &context) {
                issues.push(Issue::DerivedMismatch {
                    row: row_index,
                    field: mismatch.field,
                    supplied: mismatch.supplied,
                    derived: mismatch.derived,
                });
            }

            let mut row = order_by_schema(row, schema);
            let row_issues = validator.validate_row(row_index, &row);
            if !row_issues.is_empty() {
                trace!(row = row_index, issues = row_issues.len(), "row failed validation");
            }
            issues.extend(row_issues);

            row.insert(ORIGINAL_KEY.to_string(), Value::Object(original));
            mapped_data.push(row);
        }

        let rows_with_errors = rows_with_issues(&issues);
        let quality = quality_score(schema, &mapping, rows_with_errors, total_records);
        let detected_keys = detected_keys(schema, &mapped_data);
        info!(
            schema = %schema.schema_type,
            rows = total_records,
            rows_with_errors,
            validation_errors = issues.len(),
            quality,
            "batch normalized"
        );

        NormalizedData {
            schema_type: schema.schema_type.clone(),
            schema_category: Some(schema.category),
            status: MappingStatus::Mapped,
            original_columns,
            mapped_data,
            metadata: NormalizationMetadata {
                total_records,
                normalized_at,
                column_mappings: mapping.to_json_map(),
                column_scores: mapping.scores_json_map(),
                unmapped_columns: mapping.unmapped_columns.clone(),
                quality_score: quality,
                validation_errors: display_messages(&issues, self.options.max_reported_errors),
                validation_error_count: issues.len(),
                detected_keys,
            },
        }
    }
}

/// Raw headers of a batch: the first row's keys, without the reserved
/// back-reference key.
fn header_of(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| {
            row.keys()
                .filter(|key| key.as_str() != ORIGINAL_KEY)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Convert the mapped columns of one row. Required columns without a mapping
/// are present as null.
fn convert_row(raw: &Row, schema: &SchemaDescriptor, mapping: &ColumnMapping) -> Row {
    let mut row = Row::new();
    for column in &schema.columns {
        match mapping.raw_for(&column.name) {
            Some(raw_column) => {
                let value = raw.get(raw_column).unwrap_or(&Value::Null);
                row.insert(column.name.clone(), convert(value, column));
            }
            None if column.required => {
                row.insert(column.name.clone(), Value::Null);
            }
            None => {}
        }
    }
    row
}

/// The source row kept under `_original`.
///
/// A row that already carries a back-reference (a previous normalization's
/// output) keeps pointing at its first source.
fn back_reference(mut raw: Row) -> Row {
    match raw.remove(ORIGINAL_KEY) {
        Some(Value::Object(first_source)) => first_source,
        _ => raw,
    }
}

/// Reorder keys to schema declaration order.
fn order_by_schema(mut row: Row, schema: &SchemaDescriptor) -> Row {
    let mut ordered = Row::new();
    for column in &schema.columns {
        if let Some(value) = row.remove(&column.name) {
            ordered.insert(column.name.clone(), value);
        }
    }
    ordered.extend(row);
    ordered
}

/// Key columns that hold at least one non-missing value.
fn detected_keys(schema: &SchemaDescriptor, rows: &[Row]) -> Vec<String> {
    schema
        .key_columns()
        .filter(|column| {
            rows.iter()
                .any(|row| row.get(&column.name).is_some_and(|v| !is_missing(v)))
        })
        .map(|column| column.name.clone())
        .collect()
}

fn empty_result(domain: String, plan: Plan<'_>, normalized_at: String) -> NormalizedData {
    let (status, schema_category) = match plan {
        Plan::Mapped(schema) => (MappingStatus::Mapped, Some(schema.category)),
        Plan::PassThrough => (MappingStatus::PassThrough, None),
    };
    NormalizedData {
        schema_type: domain,
        schema_category,
        status,
        original_columns: Vec::new(),
        mapped_data: Vec::new(),
        metadata: NormalizationMetadata {
            total_records: 0,
            normalized_at,
            column_mappings: Map::new(),
            column_scores: Map::new(),
            unmapped_columns: Vec::new(),
            quality_score: 0.0,
            validation_errors: Vec::new(),
            validation_error_count: 0,
            detected_keys: Vec::new(),
        },
    }
}

fn pass_through(
    domain: String,
    original_columns: Vec<String>,
    rows: Vec<Row>,
    normalized_at: String,
) -> NormalizedData {
    NormalizedData {
        schema_type: domain,
        schema_category: None,
        status: MappingStatus::PassThrough,
        metadata: NormalizationMetadata {
            total_records: rows.len(),
            normalized_at,
            column_mappings: Map::new(),
            column_scores: Map::new(),
            unmapped_columns: original_columns.clone(),
            quality_score: PASS_THROUGH_QUALITY,
            validation_errors: Vec::new(),
            validation_error_count: 0,
            detected_keys: Vec::new(),
        },
        original_columns,
        mapped_data: rows,
    }
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
    fn back_reference_keeps_first_source() {
        let first = row(json!({"수량": "2"}));
        let mut second = row(json!({"qty": 2}));
        second.insert(ORIGINAL_KEY.to_string(), Value::Object(first.clone()));
        assert_eq!(back_reference(second), first);
        assert_eq!(back_reference(row(json!({"a": 1}))), row(json!({"a": 1})));
    }

    #[test]
    fn header_skips_back_reference() {
        let rows = vec![row(json!({"a": 1, "_original": {}, "b": 2}))];
        assert_eq!(header_of(&rows), vec!["a".to_string(), "b".to_string()]);
    }
}
