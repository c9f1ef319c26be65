//! Column matching for canonical schemas.
//!
//! [`ColumnMatcher`] maps raw headers, in any language or naming style, onto
//! the columns of a [`canon_model::SchemaDescriptor`] using the scores in
//! [`score`]. The optimal strategy pins exact name and alias hits first.

pub mod assignment;
pub mod engine;
pub mod error;
pub mod patterns;
pub mod score;
pub mod utils;

pub use engine::{ColumnMatcher, DEFAULT_MIN_SCORE, MatchOptions, MatchStrategy};
pub use error::{MapError, Result};
pub use score::{ColumnScore, MatchRule, ScoreComponent, Similarity, similarity};
