//! Validation issue types.
//!
//! Each variant carries only its needed data and renders to the message
//! strings stored in normalization metadata.

use serde::{Deserialize, Serialize};

/// Validation issue found while normalizing a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// A required schema column had no raw column. Batch level.
    RequiredUnmapped { field: String },
    /// A row value broke a column constraint.
    ConstraintViolation {
        row: usize,
        field: String,
        constraint: String,
    },
    /// A supplied value disagrees with the value derived from other fields.
    DerivedMismatch {
        row: usize,
        field: String,
        supplied: f64,
        derived: f64,
    },
}

impl Issue {
    pub fn field(&self) -> &str {
        match self {
            Issue::RequiredUnmapped { field }
            | Issue::ConstraintViolation { field, .. }
            | Issue::DerivedMismatch { field, .. } => field,
        }
    }

    /// Zero-based row index, for row-level issues.
    pub fn row(&self) -> Option<usize> {
        match self {
            Issue::RequiredUnmapped { .. } => None,
            Issue::ConstraintViolation { row, .. } | Issue::DerivedMismatch { row, .. } => {
                Some(*row)
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            Issue::RequiredUnmapped { field } => {
                format!("Required field {field} could not be mapped")
            }
            Issue::ConstraintViolation {
                row,
                field,
                constraint,
            } => format!("Row {row}: {field} violates {constraint}"),
            Issue::DerivedMismatch {
                row,
                field,
                supplied,
                derived,
            } => format!("Row {row}: {field} mismatch (supplied {supplied}, derived {derived})"),
        }
    }
}

/// Render issues for display: the first `max` messages, then a summary line
/// counting the rest.
pub fn display_messages(issues: &[Issue], max: usize) -> Vec<String> {
    let mut messages: Vec<String> = issues.iter().take(max).map(Issue::message).collect();
    let hidden = issues.len().saturating_sub(max);
    if hidden > 0 {
        messages.push(format!("... and {hidden} more validation errors"));
    }
    messages
}

/// Number of distinct rows with at least one row-level issue.
pub fn rows_with_issues(issues: &[Issue]) -> usize {
    let mut rows: Vec<usize> = issues.iter().filter_map(Issue::row).collect();
    rows.sort_unstable();
    rows.dedup();
    rows.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(row: usize) -> Issue {
        Issue::ConstraintViolation {
            row,
            field: "qty".to_string(),
            constraint: ">0".to_string(),
        }
    }

    #[test]
    fn messages() {
        assert_eq!(violation(3).message(), "Row 3: qty violates >0");
        let mismatch = Issue::DerivedMismatch {
            row: 0,
            field: "net_revenue".to_string(),
            supplied: 500.0,
            derived: 195.0,
        };
        assert_eq!(
            mismatch.message(),
            "Row 0: net_revenue mismatch (supplied 500, derived 195)"
        );
        assert_eq!(
            Issue::RequiredUnmapped {
                field: "qty".to_string()
            }
            .message(),
            "Required field qty could not be mapped"
        );
    }

    #[test]
    fn truncates_after_max() {
        let issues: Vec<Issue> = (0..13).map(violation).collect();
        let messages = display_messages(&issues, 10);
        assert_eq!(messages.len(), 11);
        assert_eq!(messages[10], "... and 3 more validation errors");
        assert_eq!(display_messages(&issues[..2], 10).len(), 2);
    }

    #[test]
    fn counts_rows_once() {
        let mut issues = vec![violation(1), violation(1), violation(4)];
        issues.push(Issue::RequiredUnmapped {
            field: "qty".to_string(),
        });
        assert_eq!(rows_with_issues(&issues), 2);
    }
}
