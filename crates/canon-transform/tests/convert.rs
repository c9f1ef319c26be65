use canon_model::{ColumnDescriptor, ColumnType};
use canon_transform::convert;
use proptest::prelude::*;
use serde_json::{Value, json};

const TYPES: [ColumnType; 8] = [
    ColumnType::String,
    ColumnType::Number,
    ColumnType::Date,
    ColumnType::Boolean,
    ColumnType::Enum,
    ColumnType::Array,
    ColumnType::Object,
    ColumnType::Geography,
];

fn column(column_type: ColumnType) -> ColumnDescriptor {
    ColumnDescriptor::new("field", column_type).with_enum_values(&["online", "offline"])
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e12_f64..1.0e12).prop_map(Value::from),
        ".{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(2, 8, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn conversion_is_total_and_typed(value in arb_value(), type_index in 0..TYPES.len()) {
        let column_type = TYPES[type_index];
        let converted = convert(&value, &column(column_type));
        let well_typed = match column_type {
            ColumnType::String | ColumnType::Date | ColumnType::Enum => {
                converted.is_null() || converted.is_string()
            }
            ColumnType::Number => converted.is_null() || converted.is_number(),
            ColumnType::Boolean => converted.is_null() || converted.is_boolean(),
            ColumnType::Array => converted.is_null() || converted.is_array(),
            ColumnType::Object | ColumnType::Geography => {
                converted.is_null() || converted.is_object()
            }
        };
        prop_assert!(well_typed, "{column_type}: {value} -> {converted}");
    }

    #[test]
    fn conversion_is_stable(value in arb_value(), type_index in 0..TYPES.len()) {
        let col = column(TYPES[type_index]);
        let once = convert(&value, &col);
        let twice = convert(&once, &col);
        prop_assert_eq!(once, twice);
    }
}

#[test]
fn enum_values_are_canonical() {
    let col = column(ColumnType::Enum);
    assert_eq!(convert(&json!(" Online "), &col), json!("online"));
    assert_eq!(convert(&json!("OFFLINE store"), &col), json!("offline"));
}
