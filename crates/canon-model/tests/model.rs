//! Tests for canon-model types.

use canon_model::{
    ColumnDescriptor, ColumnMapping, ColumnType, MappingStatus, NormalizationMetadata,
    NormalizedData, SchemaCategory, SchemaDescriptor,
};
use serde_json::{Map, json};

fn sample_schema() -> SchemaDescriptor {
    let mut schema = SchemaDescriptor::new(
        "store_dim",
        SchemaCategory::Dimension,
        vec![
            ColumnDescriptor::new("store_id", ColumnType::String)
                .required()
                .key(),
            ColumnDescriptor::new("store_name", ColumnType::String).required(),
            ColumnDescriptor::new("region", ColumnType::String),
            ColumnDescriptor::new("open_date", ColumnType::Date),
        ],
    );
    schema.partition_by = Some("open_date".to_string());
    schema
}

#[test]
fn schema_helpers() {
    let schema = sample_schema();
    let names: Vec<_> = schema
        .required_or_key_columns()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["store_id", "store_name"]);
    assert_eq!(schema.partition_column().unwrap().name, "open_date");
    assert!(schema.has_column("region"));
    assert!(!schema.has_column("Region"));
}

#[test]
fn normalized_data_serializes_snake_case() {
    let mut mapping = ColumnMapping::new();
    mapping.insert("store_id", "매장코드", 0.9);
    let data = NormalizedData {
        schema_type: "store_dim".to_string(),
        schema_category: Some(SchemaCategory::Dimension),
        status: MappingStatus::Mapped,
        original_columns: vec!["매장코드".to_string()],
        mapped_data: vec![],
        metadata: NormalizationMetadata {
            total_records: 0,
            normalized_at: "2026-01-01T00:00:00Z".to_string(),
            column_mappings: mapping.to_json_map(),
            column_scores: mapping.scores_json_map(),
            unmapped_columns: vec![],
            quality_score: 0.0,
            validation_errors: vec![],
            validation_error_count: 0,
            detected_keys: vec![],
        },
    };
    let value = serde_json::to_value(&data).expect("serialize");
    assert_eq!(value["schema_category"], json!("dimension"));
    assert_eq!(value["status"], json!("mapped"));
    assert_eq!(value["metadata"]["column_mappings"]["store_id"], json!("매장코드"));
    assert_eq!(data.mapped_column("store_id"), Some("매장코드"));
    assert!(!data.is_pass_through());

    let round: NormalizedData = serde_json::from_value(value).expect("deserialize");
    assert_eq!(round, data);
    assert_eq!(round.metadata.column_scores, {
        let mut scores = Map::new();
        scores.insert("store_id".to_string(), json!(0.9));
        scores
    });
}
