use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Canonical value type of a schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Date,
    Boolean,
    Enum,
    Array,
    Object,
    Geography,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
            ColumnType::Enum => "enum",
            ColumnType::Array => "array",
            ColumnType::Object => "object",
            ColumnType::Geography => "geography",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" | "text" => Ok(ColumnType::String),
            "number" | "numeric" => Ok(ColumnType::Number),
            "date" | "datetime" | "timestamp" => Ok(ColumnType::Date),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            "enum" => Ok(ColumnType::Enum),
            "array" => Ok(ColumnType::Array),
            "object" => Ok(ColumnType::Object),
            "geography" => Ok(ColumnType::Geography),
            _ => Err(ModelError::UnknownColumnType(s.to_string())),
        }
    }
}

/// Dimensional-modeling role of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaCategory {
    /// Events or measurements (one row per occurrence).
    Fact,
    /// Descriptive entities, versioned with SCD2 fields.
    Dimension,
    /// Many-to-many link between two dimensions.
    Bridge,
}

impl SchemaCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaCategory::Fact => "fact",
            SchemaCategory::Dimension => "dimension",
            SchemaCategory::Bridge => "bridge",
        }
    }
}

impl fmt::Display for SchemaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fact" => Ok(SchemaCategory::Fact),
            "dimension" | "dim" => Ok(SchemaCategory::Dimension),
            "bridge" => Ok(SchemaCategory::Bridge),
            _ => Err(ModelError::UnknownCategory(s.to_string())),
        }
    }
}

/// One column of a canonical schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub required: bool,
    /// Participates in entity identity and joins.
    #[serde(default)]
    pub is_key: bool,
    #[serde(default)]
    pub is_pii: bool,
    #[serde(default)]
    pub description: String,
    /// Known raw-header aliases, in priority order.
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub enum_values: Vec<String>,
    /// Rule strings such as `NOT NULL`, `>=0`, `>0`.
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            required: false,
            is_key: false,
            is_pii: false,
            description: String::new(),
            examples: Vec::new(),
            enum_values: Vec::new(),
            constraints: Vec::new(),
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_examples(mut self, examples: &[&str]) -> Self {
        self.examples = examples.iter().map(|e| (*e).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_enum_values(mut self, values: &[&str]) -> Self {
        self.enum_values = values.iter().map(|v| (*v).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_constraints(mut self, constraints: &[&str]) -> Self {
        self.constraints = constraints.iter().map(|c| (*c).to_string()).collect();
        self
    }

    /// Columns that count toward mapping coverage in the quality score.
    pub fn is_required_or_key(&self) -> bool {
        self.required || self.is_key
    }
}

/// One canonical domain schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Registry key, e.g. `sales_fact`.
    #[serde(rename = "type")]
    pub schema_type: String,
    pub category: SchemaCategory,
    /// Real-world meaning of one row.
    #[serde(default)]
    pub grain: String,
    pub columns: Vec<ColumnDescriptor>,
    /// Other schema types this one references.
    #[serde(default)]
    pub relations: Vec<String>,
    #[serde(default)]
    pub partition_by: Option<String>,
    #[serde(default)]
    pub quality_checks: Vec<String>,
    /// Overrides the matcher's acceptance threshold for this schema.
    #[serde(default)]
    pub min_match_score: Option<f64>,
}

impl SchemaDescriptor {
    pub fn new(
        schema_type: impl Into<String>,
        category: SchemaCategory,
        columns: Vec<ColumnDescriptor>,
    ) -> Self {
        Self {
            schema_type: schema_type.into(),
            category,
            grain: String::new(),
            columns,
            relations: Vec::new(),
            partition_by: None,
            quality_checks: Vec::new(),
            min_match_score: None,
        }
    }

    /// Find a column by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn key_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|column| column.is_key)
    }

    pub fn required_or_key_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|column| column.is_required_or_key())
    }

    pub fn is_dimension(&self) -> bool {
        self.category == SchemaCategory::Dimension
    }

    /// The partition column, when configured and declared.
    pub fn partition_column(&self) -> Option<&ColumnDescriptor> {
        self.partition_by
            .as_deref()
            .and_then(|name| self.column(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_type_parses_aliases() {
        assert_eq!("Numeric".parse::<ColumnType>().unwrap(), ColumnType::Number);
        assert_eq!(" bool ".parse::<ColumnType>().unwrap(), ColumnType::Boolean);
        assert!("blob".parse::<ColumnType>().is_err());
    }

    #[test]
    fn category_round_trips_display() {
        for category in [
            SchemaCategory::Fact,
            SchemaCategory::Dimension,
            SchemaCategory::Bridge,
        ] {
            assert_eq!(category.to_string().parse::<SchemaCategory>().unwrap(), category);
        }
    }

    #[test]
    fn schema_deserializes_with_defaults() {
        let json = r#"{
            "type": "store_dim",
            "category": "dimension",
            "columns": [
                {"name": "store_id", "type": "string", "required": true, "is_key": true},
                {"name": "store_name", "type": "string"}
            ]
        }"#;
        let schema: SchemaDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(schema.schema_type, "store_dim");
        assert!(schema.is_dimension());
        assert_eq!(schema.key_columns().count(), 1);
        assert!(schema.column("store_name").unwrap().examples.is_empty());
        assert!(schema.partition_column().is_none());
    }
}
