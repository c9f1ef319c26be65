//! Reading raw batches from disk.
//!
//! `.json` files hold an array of objects (a single object is one row).
//! Everything else is read as CSV with a header line.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use serde_json::Value;

use canon_model::Row;

use crate::logging::{log_data_enabled, redact_value};

/// Read one batch from a JSON or CSV file.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let rows = if is_json {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read json: {}", path.display()))?;
        parse_json_rows(&text).with_context(|| format!("parse json: {}", path.display()))?
    } else {
        let file = File::open(path).with_context(|| format!("read csv: {}", path.display()))?;
        read_csv_rows(file).with_context(|| format!("parse csv: {}", path.display()))?
    };
    tracing::debug!(path = %path.display(), rows = rows.len(), "batch read");
    if log_data_enabled()
        && let Some(first) = rows.first()
    {
        let sample = Value::Object(first.clone()).to_string();
        tracing::trace!(sample = redact_value(&sample), "first row");
    }
    Ok(rows)
}

/// Parse a JSON array of objects.
pub fn parse_json_rows(text: &str) -> Result<Vec<Row>> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(row) => Ok(row),
                other => bail!("element {index} is not an object: {other}"),
            })
            .collect(),
        Value::Object(row) => Ok(vec![row]),
        _ => bail!("expected an array of objects"),
    }
}

/// Read CSV records keyed by the header line.
///
/// Cells are trimmed and empty cells become null. Blank lines are skipped.
/// When a header repeats, the first column with that name wins.
pub fn read_csv_rows<R: Read>(reader: R) -> Result<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("read header")?
        .iter()
        .map(normalize_header)
        .collect();
    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read record {index}"))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let mut row = Row::new();
        for (column, header) in headers.iter().enumerate() {
            let cell = normalize_cell(record.get(column).unwrap_or(""));
            let value = if cell.is_empty() {
                Value::Null
            } else {
                Value::String(cell)
            };
            row.entry(header.clone()).or_insert(value);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Batch label for a file: its stem, or the full name when there is none.
pub fn label_for(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn csv_headers_and_cells_are_cleaned() {
        let data = "\u{feff}고객ID , 고객  이름,가입일\nC001, 홍길동 ,\n,,\nC002,김철수,2024-01-05\n";
        let rows = read_csv_rows(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["고객ID"], json!("C001"));
        assert_eq!(rows[0]["고객 이름"], json!("홍길동"));
        assert_eq!(rows[0]["가입일"], Value::Null);
        assert_eq!(rows[1]["가입일"], json!("2024-01-05"));
    }

    #[test]
    fn csv_short_records_fill_with_null() {
        let rows = read_csv_rows("a,b,c\n1,2\n".as_bytes()).unwrap();
        assert_eq!(rows[0]["c"], Value::Null);
    }

    #[test]
    fn csv_duplicate_header_keeps_first() {
        let rows = read_csv_rows("qty,qty\n1,2\n".as_bytes()).unwrap();
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[0]["qty"], json!("1"));
    }

    #[test]
    fn json_array_of_objects() {
        let rows = parse_json_rows(r#"[{"qty": 2}, {"qty": 3}]"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["qty"], json!(3));
    }

    #[test]
    fn json_single_object_is_one_row() {
        assert_eq!(parse_json_rows(r#"{"qty": 2}"#).unwrap().len(), 1);
    }

    #[test]
    fn json_rejects_scalars() {
        assert!(parse_json_rows("[1, 2]").is_err());
        assert!(parse_json_rows("\"rows\"").is_err());
    }

    #[test]
    fn label_is_file_stem() {
        assert_eq!(label_for(Path::new("in/2024_매출_export.csv")), "2024_매출_export");
        assert_eq!(label_for(Path::new("weather")), "weather");
    }
}
