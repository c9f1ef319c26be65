//! Batch normalization onto canonical schemas.
//!
//! [`Normalizer`] ties the catalog, matcher, converter and validator together
//! and produces a [`canon_model::NormalizedData`] with a quality score for
//! every batch it is given.

pub mod normalizer;
pub mod options;
pub mod quality;

pub use normalizer::{Normalizer, Plan};
pub use options::{DEFAULT_MAX_REPORTED_ERRORS, DEFAULT_REVENUE_TOLERANCE, NormalizeOptions};
pub use quality::{PASS_THROUGH_QUALITY, coverage, quality_score};
