//! Constraint checking and validation issues.
//!
//! - [`Constraint`]: the typed constraint grammar
//! - [`RowValidator`]: per-batch checker for a schema's constrained columns
//! - [`Issue`]: typed issues with their rendered messages

pub mod constraint;
pub mod issue;
pub mod validator;

pub use constraint::{Constraint, validate};
pub use issue::{Issue, display_messages, rows_with_issues};
pub use validator::RowValidator;
