//! Embedded catalog data.
//!
//! The built-in schema catalog and lexicon are embedded at compile time using
//! `include_str!()`, so the registry never touches the filesystem.

/// Canonical schema catalog (JSON array of schema descriptors).
pub const SCHEMAS_JSON: &str = include_str!("../data/schemas.json");

/// Synonym table and domain keyword table.
pub const LEXICON_JSON: &str = include_str!("../data/lexicon.json");
