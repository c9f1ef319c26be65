//! Row validation against a schema's column constraints.

use canon_model::{Row, SchemaDescriptor};
use serde_json::Value;
use tracing::debug;

use crate::constraint::Constraint;
use crate::issue::Issue;

/// A parsed rule with its declared text, which issue messages quote.
#[derive(Debug, Clone)]
struct DeclaredConstraint {
    text: String,
    rule: Constraint,
}

/// Constraints of one schema, parsed once per batch.
#[derive(Debug, Clone)]
pub struct RowValidator {
    columns: Vec<(String, Vec<DeclaredConstraint>)>,
}

impl RowValidator {
    /// Parse every column constraint of `schema`.
    ///
    /// Unrecognized rules are logged once here and pass on every row.
    pub fn new(schema: &SchemaDescriptor) -> Self {
        let columns: Vec<(String, Vec<DeclaredConstraint>)> = schema
            .columns
            .iter()
            .filter(|column| !column.constraints.is_empty())
            .map(|column| {
                let parsed: Vec<DeclaredConstraint> = column
                    .constraints
                    .iter()
                    .map(|raw| DeclaredConstraint {
                        text: raw.trim().to_string(),
                        rule: Constraint::parse(raw),
                    })
                    .collect();
                for declared in parsed.iter().filter(|c| !c.rule.is_recognized()) {
                    debug!(
                        schema = %schema.schema_type,
                        column = %column.name,
                        constraint = %declared.text,
                        "unrecognized constraint treated as satisfied"
                    );
                }
                (column.name.clone(), parsed)
            })
            .collect();
        Self { columns }
    }

    /// Number of constrained columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Check every constrained column of one row. Absent columns are null.
    pub fn validate_row(&self, row_index: usize, row: &Row) -> Vec<Issue> {
        let mut issues = Vec::new();
        for (field, constraints) in &self.columns {
            let value = row.get(field).unwrap_or(&Value::Null);
            for declared in constraints {
                if !declared.rule.check(value) {
                    issues.push(Issue::ConstraintViolation {
                        row: row_index,
                        field: field.clone(),
                        constraint: declared.text.clone(),
                    });
                }
            }
        }
        issues
    }
}
