//! Domain derivations applied to converted rows.
//!
//! Each derivation only runs when its target column is declared by the
//! schema, and never overwrites a supplied value.

use canon_model::{ColumnType, Row, SchemaDescriptor, is_missing};
use chrono::NaiveDateTime;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::normalization::{date_part, format_iso8601_datetime, number_value, value_as_f64};

pub const TRANSACTION_ID: &str = "transaction_id";
pub const NET_REVENUE: &str = "net_revenue";
pub const QTY: &str = "qty";
pub const UNIT_PRICE: &str = "unit_price";
pub const LINE_DISCOUNT: &str = "line_discount";
pub const LINE_TAX: &str = "line_tax";
pub const IS_CURRENT: &str = "is_current";
pub const VALID_FROM: &str = "valid_from";
pub const VALID_TO: &str = "valid_to";

/// Hex characters kept from the digest in a synthetic transaction id.
const SYNTHETIC_ID_LEN: usize = 12;

/// Per-row inputs for [`derive_row`].
#[derive(Debug, Clone, Copy)]
pub struct DeriveContext<'a> {
    /// Zero-based position of the row in its batch.
    pub row_index: usize,
    /// The row as received, before conversion.
    pub original: &'a Row,
    /// Timestamp used for `valid_from`.
    pub now: NaiveDateTime,
    /// Allowed absolute difference between supplied and derived revenue.
    pub revenue_tolerance: f64,
}

/// A supplied value that disagrees with the value derived from its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMismatch {
    pub field: String,
    pub supplied: f64,
    pub derived: f64,
}

/// Run all derivations on one converted row.
///
/// Returns the supplied values that disagree with their derivation. The
/// supplied value is retained in the row.
pub fn derive_row(
    row: &mut Row,
    schema: &SchemaDescriptor,
    context: &DeriveContext<'_>,
) -> Vec<DerivedMismatch> {
    let mut mismatches = Vec::new();

    if schema.has_column(TRANSACTION_ID) && row.get(TRANSACTION_ID).is_none_or(is_missing) {
        let id = synthetic_transaction_id(context.row_index, context.original);
        trace!(row = context.row_index, "derived transaction id");
        row.insert(TRANSACTION_ID.to_string(), Value::String(id));
    }

    if schema.has_column(NET_REVENUE)
        && let Some(mismatch) = derive_net_revenue(row, context.revenue_tolerance)
    {
        mismatches.push(mismatch);
    }

    if schema.is_dimension() {
        apply_scd2_defaults(row, schema, context.now);
    }

    backfill_partition(row, schema);
    mismatches
}

/// `TXN-` plus the first 12 hex characters of SHA-256 over the row index and
/// the original row's JSON text.
pub fn synthetic_transaction_id(row_index: usize, original: &Row) -> String {
    let mut hasher = Sha256::new();
    hasher.update(row_index.to_string().as_bytes());
    hasher.update(b":");
    hasher.update(Value::Object(original.clone()).to_string().as_bytes());
    let digest = hex::encode_upper(hasher.finalize());
    format!("TXN-{}", &digest[..SYNTHETIC_ID_LEN])
}

/// `qty × unit_price − line_discount + line_tax`, when qty and unit price are
/// numeric. Discount and tax default to zero.
pub fn net_revenue(row: &Row) -> Option<f64> {
    let number = |field: &str| row.get(field).and_then(value_as_f64);
    let qty = number(QTY)?;
    let unit_price = number(UNIT_PRICE)?;
    let discount = number(LINE_DISCOUNT).unwrap_or(0.0);
    let tax = number(LINE_TAX).unwrap_or(0.0);
    Some(qty * unit_price - discount + tax)
}

fn derive_net_revenue(row: &mut Row, tolerance: f64) -> Option<DerivedMismatch> {
    let derived = net_revenue(row)?;
    match row.get(NET_REVENUE).and_then(value_as_f64) {
        Some(supplied) if (supplied - derived).abs() > tolerance => Some(DerivedMismatch {
            field: NET_REVENUE.to_string(),
            supplied,
            derived,
        }),
        Some(_) => None,
        None => {
            row.insert(NET_REVENUE.to_string(), number_value(derived));
            None
        }
    }
}

/// Version fields for slowly changing dimensions: current, valid from now,
/// open-ended.
fn apply_scd2_defaults(row: &mut Row, schema: &SchemaDescriptor, now: NaiveDateTime) {
    if schema.has_column(IS_CURRENT) && row.get(IS_CURRENT).is_none_or(is_missing) {
        row.insert(IS_CURRENT.to_string(), Value::Bool(true));
    }
    if schema.has_column(VALID_FROM) && row.get(VALID_FROM).is_none_or(is_missing) {
        row.insert(
            VALID_FROM.to_string(),
            Value::String(format_iso8601_datetime(now)),
        );
    }
    if schema.has_column(VALID_TO) && !row.contains_key(VALID_TO) {
        row.insert(VALID_TO.to_string(), Value::Null);
    }
}

/// Fill an empty partition column with the date part of the first non-null
/// date column in declaration order.
fn backfill_partition(row: &mut Row, schema: &SchemaDescriptor) {
    let Some(partition) = schema.partition_column() else {
        return;
    };
    if !row.get(&partition.name).is_none_or(is_missing) {
        return;
    }
    let day = schema
        .columns
        .iter()
        .filter(|c| c.column_type == ColumnType::Date && c.name != partition.name)
        .filter_map(|c| row.get(&c.name).and_then(Value::as_str))
        .find_map(date_part);
    if let Some(day) = day {
        row.insert(partition.name.clone(), Value::String(day));
    }
}
