use std::fs;

use serde_json::json;
use tempfile::TempDir;

use canon_cli::input::{label_for, read_rows};
use canon_core::Normalizer;
use canon_model::MappingStatus;
use canon_standards::{Lexicon, SchemaRegistry};

fn normalize_file(dir: &TempDir, name: &str, contents: &str) -> canon_model::NormalizedData {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    let rows = read_rows(&path).unwrap();
    let registry = SchemaRegistry::load_embedded().unwrap();
    let lexicon = Lexicon::load_embedded().unwrap();
    Normalizer::new(&registry, &lexicon).normalize(&rows, &label_for(&path))
}

#[test]
fn csv_customer_file_maps_korean_headers() {
    let dir = TempDir::new().unwrap();
    let result = normalize_file(
        &dir,
        "고객_마스터.csv",
        "고객ID,고객명,이메일\nC001,홍길동,hong@example.com\nC002,김철수,kim@example.com\n",
    );
    assert_eq!(result.schema_type, "customer_dim");
    assert_eq!(result.status, MappingStatus::Mapped);
    assert_eq!(result.mapped_column("customer_id"), Some("고객ID"));
    assert_eq!(result.mapped_data[1]["customer_id"], json!("C002"));
    assert_eq!(result.metadata.total_records, 2);
}

#[test]
fn json_sales_file_derives_revenue() {
    let dir = TempDir::new().unwrap();
    let result = normalize_file(
        &dir,
        "2024_매출_export.json",
        r#"[{"transaction_id": "T1", "qty": "2", "unit_price": "100", "line_discount": "10", "line_tax": "5"}]"#,
    );
    assert_eq!(result.schema_type, "sales_fact");
    assert_eq!(result.mapped_data[0]["net_revenue"], json!(195));
}

#[test]
fn unknown_domain_passes_rows_through() {
    let dir = TempDir::new().unwrap();
    let result = normalize_file(&dir, "weather.csv", "city,temp\nSeoul,21\n");
    assert!(result.is_pass_through());
    assert_eq!(result.mapped_data[0]["city"], json!("Seoul"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = read_rows(&dir.path().join("absent.csv")).unwrap_err();
    assert!(format!("{err:#}").contains("absent.csv"));
}
