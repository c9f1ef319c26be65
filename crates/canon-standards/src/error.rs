//! Error types for catalog loading.

use thiserror::Error;

/// Errors that can occur when loading a schema catalog or lexicon.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    /// The catalog text is not valid JSON for the expected shape.
    #[error("Failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Two schemas share the same type key.
    #[error("Duplicate schema type '{schema_type}'")]
    DuplicateSchema { schema_type: String },

    /// A schema declares the same column twice.
    #[error("Schema '{schema_type}' declares column '{column}' more than once")]
    DuplicateColumn { schema_type: String, column: String },

    /// `partition_by` names a column the schema does not declare.
    #[error("Schema '{schema_type}' partitions by undeclared column '{column}'")]
    UnknownPartitionColumn { schema_type: String, column: String },

    /// An enum column has no allowed values.
    #[error("Enum column '{column}' in schema '{schema_type}' has no enum values")]
    MissingEnumValues { schema_type: String, column: String },
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
