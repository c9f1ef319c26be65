//! Canonical schema catalog, lexicon, and domain detection.
//!
//! This crate provides:
//!
//! - [`SchemaRegistry`]: the immutable catalog of canonical schemas
//! - [`Lexicon`]: the bilingual synonym table and domain keyword table
//! - [`DomainDetector`]: label to domain type resolution
//!
//! Both catalogs are embedded at compile time (see [`embedded`]) and can be
//! replaced with alternate JSON for tests or deployments.
//!
//! # Example
//!
//! ```rust,ignore
//! use canon_standards::{DomainDetector, Lexicon, SchemaRegistry};
//!
//! let registry = SchemaRegistry::load_embedded()?;
//! let lexicon = Lexicon::load_embedded()?;
//! let domain = DomainDetector::new(&lexicon).detect("2024_매출_export.xlsx");
//! assert_eq!(domain, "sales_fact");
//! let schema = registry.lookup(&domain).unwrap();
//! ```

pub mod detector;
pub mod embedded;
pub mod error;
pub mod lexicon;
pub mod registry;
pub mod text;

pub use detector::{DomainDetector, OTHER_DOMAIN};
pub use error::{CatalogError, Result};
pub use lexicon::{DomainKeywords, Lexicon, SynonymGroup};
pub use registry::SchemaRegistry;
pub use text::compact;
