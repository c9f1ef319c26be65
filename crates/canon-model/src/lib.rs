//! Data model for the canonical schema normalization engine.
//!
//! - [`schema`]: canonical schemas and their column descriptors
//! - [`row`]: raw and normalized row representation
//! - [`mapping`]: schema-column to raw-column mappings
//! - [`normalized`]: the per-batch normalization result

pub mod error;
pub mod mapping;
pub mod normalized;
pub mod row;
pub mod schema;

pub use error::{ModelError, Result};
pub use mapping::{ColumnMapping, MappedColumn};
pub use normalized::{MappingStatus, NormalizationMetadata, NormalizedData};
pub use row::{ORIGINAL_KEY, Row, is_missing};
pub use schema::{ColumnDescriptor, ColumnType, SchemaCategory, SchemaDescriptor};
