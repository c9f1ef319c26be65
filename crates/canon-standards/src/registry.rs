//! Schema registry.
//!
//! The registry is built once from a catalog and never mutated afterwards.
//! Callers share it by reference across threads.

use std::collections::{BTreeMap, BTreeSet};

use canon_model::{ColumnType, SchemaDescriptor};

use crate::embedded::SCHEMAS_JSON;
use crate::error::{CatalogError, Result};

/// Immutable catalog of canonical schemas keyed by schema type.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Vec<SchemaDescriptor>,
    index: BTreeMap<String, usize>,
}

impl SchemaRegistry {
    /// Load the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded catalog is malformed or violates a
    /// schema invariant.
    pub fn load_embedded() -> Result<Self> {
        Self::from_json_str(SCHEMAS_JSON)
    }

    /// Parse and validate a catalog from a JSON array of schemas.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let schemas: Vec<SchemaDescriptor> =
            serde_json::from_str(json).map_err(|source| CatalogError::Parse {
                what: "schema catalog",
                source,
            })?;
        Self::from_schemas(schemas)
    }

    /// Build a registry from already-constructed schemas.
    pub fn from_schemas(schemas: Vec<SchemaDescriptor>) -> Result<Self> {
        let mut index = BTreeMap::new();
        for (position, schema) in schemas.iter().enumerate() {
            validate_schema(schema)?;
            if index.insert(schema.schema_type.clone(), position).is_some() {
                return Err(CatalogError::DuplicateSchema {
                    schema_type: schema.schema_type.clone(),
                });
            }
        }
        tracing::debug!(schemas = schemas.len(), "schema registry loaded");
        Ok(Self { schemas, index })
    }

    /// Look up a schema by its type key.
    pub fn lookup(&self, schema_type: &str) -> Option<&SchemaDescriptor> {
        self.index
            .get(schema_type)
            .and_then(|&position| self.schemas.get(position))
    }

    pub fn contains(&self, schema_type: &str) -> bool {
        self.index.contains_key(schema_type)
    }

    /// Schema types in catalog order.
    pub fn schema_types(&self) -> Vec<&str> {
        self.schemas
            .iter()
            .map(|schema| schema.schema_type.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaDescriptor> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn validate_schema(schema: &SchemaDescriptor) -> Result<()> {
    let mut seen = BTreeSet::new();
    for column in &schema.columns {
        if !seen.insert(column.name.as_str()) {
            return Err(CatalogError::DuplicateColumn {
                schema_type: schema.schema_type.clone(),
                column: column.name.clone(),
            });
        }
        if column.column_type == ColumnType::Enum && column.enum_values.is_empty() {
            return Err(CatalogError::MissingEnumValues {
                schema_type: schema.schema_type.clone(),
                column: column.name.clone(),
            });
        }
    }
    if let Some(partition) = &schema.partition_by
        && !seen.contains(partition.as_str())
    {
        return Err(CatalogError::UnknownPartitionColumn {
            schema_type: schema.schema_type.clone(),
            column: partition.clone(),
        });
    }
    Ok(())
}
