use canon_model::{ColumnDescriptor, ColumnType, Row, SchemaCategory, SchemaDescriptor};
use canon_validate::{Constraint, Issue, RowValidator, rows_with_issues};
use proptest::prelude::*;
use serde_json::{Value, json};

fn schema() -> SchemaDescriptor {
    SchemaDescriptor::new(
        "sales_fact",
        SchemaCategory::Fact,
        vec![
            ColumnDescriptor::new("transaction_id", ColumnType::String)
                .required()
                .with_constraints(&["NOT NULL"]),
            ColumnDescriptor::new("qty", ColumnType::Number)
                .with_constraints(&["NOT NULL", ">0"]),
            ColumnDescriptor::new("unit_price", ColumnType::Number)
                .with_constraints(&[">=0", "UNIQUE"]),
            ColumnDescriptor::new("channel", ColumnType::Enum).with_enum_values(&["online"]),
        ],
    )
}

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[test]
fn clean_row_has_no_issues() {
    let validator = RowValidator::new(&schema());
    assert_eq!(validator.len(), 3);
    let issues = validator.validate_row(0, &row(json!({
        "transaction_id": "T1", "qty": 2, "unit_price": 0
    })));
    assert!(issues.is_empty());
}

#[test]
fn violations_name_row_field_and_rule() {
    let validator = RowValidator::new(&schema());
    let issues = validator.validate_row(7, &row(json!({
        "transaction_id": null, "qty": 0, "unit_price": -1
    })));
    let messages: Vec<String> = issues.iter().map(Issue::message).collect();
    assert_eq!(
        messages,
        vec![
            "Row 7: transaction_id violates NOT NULL",
            "Row 7: qty violates >0",
            "Row 7: unit_price violates >=0",
        ]
    );
    assert_eq!(rows_with_issues(&issues), 1);
}

#[test]
fn absent_columns_are_checked_as_null() {
    let validator = RowValidator::new(&schema());
    let issues = validator.validate_row(0, &Row::new());
    let fields: Vec<&str> = issues.iter().map(Issue::field).collect();
    assert_eq!(fields, vec!["transaction_id", "qty"]);
}

#[test]
fn messages_quote_the_declared_rule() {
    let schema = SchemaDescriptor::new(
        "sensor_fact",
        SchemaCategory::Fact,
        vec![
            ColumnDescriptor::new("x", ColumnType::Number)
                .with_constraints(&[" > 0.5 ", "not null"]),
        ],
    );
    let validator = RowValidator::new(&schema);

    let low = validator.validate_row(0, &row(json!({"x": 0.1})));
    let messages: Vec<String> = low.iter().map(Issue::message).collect();
    assert_eq!(messages, vec!["Row 0: x violates > 0.5"]);

    let missing = validator.validate_row(1, &row(json!({"x": null})));
    let messages: Vec<String> = missing.iter().map(Issue::message).collect();
    assert_eq!(messages, vec!["Row 1: x violates not null"]);
}

proptest! {
    #[test]
    fn parse_accepts_any_text(text in "\\PC{0,16}") {
        let parsed = Constraint::parse(&text);
        prop_assert_eq!(Constraint::parse(&parsed.to_string()), parsed);
    }

    #[test]
    fn numeric_rules_survive_display(bound in -1.0e9f64..1.0e9, op in 0usize..4) {
        let text = format!("{}{bound}", [">=", ">", "<=", "<"][op]);
        let parsed = Constraint::parse(&text);
        prop_assert!(parsed.is_recognized());
        prop_assert_eq!(parsed.to_string(), text);
    }
}
