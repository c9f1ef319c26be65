//! Row transformation for canonical schemas.
//!
//! - [`convert`]: total coercion of raw values to a column's declared type
//! - [`merge`]: folding of `field[index]` keys into array fields
//! - [`derive`]: synthetic ids, revenue, SCD2 defaults, partition back-fill
//! - [`normalization`]: date and number parsing helpers

pub mod convert;
pub mod derive;
pub mod merge;
pub mod normalization;

pub use convert::convert;
pub use derive::{DeriveContext, DerivedMismatch, derive_row, net_revenue, synthetic_transaction_id};
pub use merge::{merge_indexed_fields, merge_rows, split_indexed_key};
