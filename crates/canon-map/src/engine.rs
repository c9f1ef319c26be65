//! Column matcher: assigns raw headers to canonical schema columns.

use std::fmt;
use std::str::FromStr;

use canon_model::{ColumnDescriptor, ColumnMapping, SchemaDescriptor};
use canon_standards::Lexicon;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::assignment::max_weight_assignment;
use crate::error::{MapError, Result};
use crate::patterns::find_exact_pins;
use crate::score::{ColumnScore, Similarity, score_column, similarity};
use crate::utils::safe_column_name;

/// Acceptance threshold used when a schema does not set its own.
pub const DEFAULT_MIN_SCORE: f64 = 0.15;

/// How schema columns are paired with raw headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// One pass in schema declaration order; each column takes its best
    /// unused header. An earlier column may take a header a later column
    /// matches exactly.
    #[default]
    Greedy,
    /// Exact name and example pins first, then the maximum total score over
    /// the remaining one-to-one pairings.
    Optimal,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Greedy => "greedy",
            MatchStrategy::Optimal => "optimal",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStrategy {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "greedy" => Ok(MatchStrategy::Greedy),
            "optimal" | "hungarian" => Ok(MatchStrategy::Optimal),
            other => Err(MapError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Matcher configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    pub strategy: MatchStrategy,
    /// Used when the schema carries no `min_match_score`.
    pub min_score: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::Greedy,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl MatchOptions {
    #[must_use]
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the fallback acceptance threshold.
    ///
    /// # Errors
    ///
    /// Returns an error when `min_score` is outside `[0, 1]` or not a number.
    pub fn with_min_score(mut self, min_score: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&min_score) {
            return Err(MapError::InvalidThreshold(min_score));
        }
        self.min_score = min_score;
        Ok(self)
    }
}

/// Matches raw headers to the columns of one schema.
///
/// The matcher borrows an immutable [`Lexicon`] and holds no other state, so a
/// single instance can serve many batches concurrently.
///
/// # Example
///
/// ```ignore
/// use canon_map::{ColumnMatcher, MatchOptions};
///
/// let matcher = ColumnMatcher::new(&lexicon, MatchOptions::default());
/// let mapping = matcher.match_columns(&["고객ID".to_string()], schema);
/// assert_eq!(mapping.raw_for("customer_id"), Some("고객ID"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ColumnMatcher<'a> {
    lexicon: &'a Lexicon,
    options: MatchOptions,
}

impl<'a> ColumnMatcher<'a> {
    pub fn new(lexicon: &'a Lexicon, options: MatchOptions) -> Self {
        Self { lexicon, options }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn lexicon(&self) -> &'a Lexicon {
        self.lexicon
    }

    /// Acceptance threshold for a schema: its own `min_match_score`, else the
    /// matcher default. A candidate must score strictly above it.
    pub fn threshold_for(&self, schema: &SchemaDescriptor) -> f64 {
        schema.min_match_score.unwrap_or(self.options.min_score)
    }

    /// Similarity of two arbitrary strings.
    pub fn similarity(&self, left: &str, right: &str) -> Similarity {
        similarity(self.lexicon, left, right)
    }

    /// Score a raw header against a schema column.
    pub fn score(&self, raw: &str, column: &ColumnDescriptor) -> f64 {
        score_column(self.lexicon, raw, column).score
    }

    /// Score with a component breakdown, for diagnostics.
    pub fn explain(&self, raw: &str, column: &ColumnDescriptor) -> ColumnScore {
        score_column(self.lexicon, raw, column)
    }

    /// Build an injective mapping from schema columns to raw headers.
    ///
    /// Raw headers that were not assigned are listed in
    /// [`ColumnMapping::unmapped_columns`] in input order. Entries follow schema
    /// declaration order. Never fails: an empty header list yields an empty
    /// mapping.
    pub fn match_columns(&self, raw_columns: &[String], schema: &SchemaDescriptor) -> ColumnMapping {
        let threshold = self.threshold_for(schema);
        let mut mapping = ColumnMapping::new();
        let mut raw_used = vec![false; raw_columns.len()];
        let mut schema_used = vec![false; schema.columns.len()];

        if self.options.strategy == MatchStrategy::Optimal {
            for pin in find_exact_pins(raw_columns, schema) {
                let column = &schema.columns[pin.schema_index];
                let raw = &raw_columns[pin.raw_index];
                if mapping.insert(column.name.clone(), raw.clone(), 1.0) {
                    raw_used[pin.raw_index] = true;
                    schema_used[pin.schema_index] = true;
                    trace!(schema_column = %column.name, raw_column = %raw, "exact pin");
                }
            }
        }

        // Blank headers never take part in fuzzy matching.
        for (index, raw) in raw_columns.iter().enumerate() {
            if safe_column_name(raw).is_empty() {
                raw_used[index] = true;
            }
        }

        match self.options.strategy {
            MatchStrategy::Greedy => self.assign_greedy(
                raw_columns,
                schema,
                threshold,
                &mut mapping,
                &mut raw_used,
                &schema_used,
            ),
            MatchStrategy::Optimal => self.assign_optimal(
                raw_columns,
                schema,
                threshold,
                &mut mapping,
                &mut raw_used,
                &schema_used,
            ),
        }

        mapping.sort_by_schema_order(schema.columns.iter().map(|c| c.name.as_str()));
        mapping.unmapped_columns = raw_columns
            .iter()
            .filter(|raw| mapping.schema_for(raw).is_none())
            .cloned()
            .collect();

        debug!(
            schema = %schema.schema_type,
            strategy = %self.options.strategy,
            threshold,
            mapped = mapping.len(),
            unmapped = mapping.unmapped_columns.len(),
            "matched columns"
        );
        mapping
    }

    fn assign_greedy(
        &self,
        raw_columns: &[String],
        schema: &SchemaDescriptor,
        threshold: f64,
        mapping: &mut ColumnMapping,
        raw_used: &mut [bool],
        schema_used: &[bool],
    ) {
        for (schema_index, column) in schema.columns.iter().enumerate() {
            if schema_used[schema_index] {
                continue;
            }
            let mut best: Option<(usize, f64)> = None;
            for (raw_index, raw) in raw_columns.iter().enumerate() {
                if raw_used[raw_index] {
                    continue;
                }
                let score = self.score(raw, column);
                // Strict comparison keeps the first header on ties.
                if best.is_none_or(|(_, best_score)| score > best_score) {
                    best = Some((raw_index, score));
                }
            }
            if let Some((raw_index, score)) = best
                && score > threshold
                && mapping.insert(column.name.clone(), raw_columns[raw_index].clone(), score)
            {
                raw_used[raw_index] = true;
                trace!(
                    schema_column = %column.name,
                    raw_column = %raw_columns[raw_index],
                    score,
                    "greedy match"
                );
            }
        }
    }

    fn assign_optimal(
        &self,
        raw_columns: &[String],
        schema: &SchemaDescriptor,
        threshold: f64,
        mapping: &mut ColumnMapping,
        raw_used: &mut [bool],
        schema_used: &[bool],
    ) {
        let open_columns: Vec<usize> = (0..schema.columns.len())
            .filter(|i| !schema_used[*i])
            .collect();
        let open_raws: Vec<usize> = (0..raw_columns.len()).filter(|i| !raw_used[*i]).collect();
        if open_columns.is_empty() || open_raws.is_empty() {
            return;
        }

        let weights: Vec<Vec<f64>> = open_columns
            .iter()
            .map(|&s| {
                open_raws
                    .iter()
                    .map(|&r| self.score(&raw_columns[r], &schema.columns[s]))
                    .collect()
            })
            .collect();
        let eligible: Vec<Vec<bool>> = weights
            .iter()
            .map(|row| row.iter().map(|&w| w > threshold).collect())
            .collect();

        for (row, assigned) in max_weight_assignment(&weights, &eligible)
            .into_iter()
            .enumerate()
        {
            let Some(col) = assigned else { continue };
            let column = &schema.columns[open_columns[row]];
            let raw_index = open_raws[col];
            let score = weights[row][col];
            if mapping.insert(column.name.clone(), raw_columns[raw_index].clone(), score) {
                raw_used[raw_index] = true;
                trace!(
                    schema_column = %column.name,
                    raw_column = %raw_columns[raw_index],
                    score,
                    "optimal match"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses() {
        assert_eq!("Optimal".parse::<MatchStrategy>().unwrap(), MatchStrategy::Optimal);
        assert_eq!("greedy".parse::<MatchStrategy>().unwrap(), MatchStrategy::Greedy);
        assert!("best".parse::<MatchStrategy>().is_err());
    }

    #[test]
    fn threshold_bounds_are_checked() {
        assert!(MatchOptions::default().with_min_score(1.5).is_err());
        assert!(MatchOptions::default().with_min_score(f64::NAN).is_err());
        let options = MatchOptions::default().with_min_score(0.4).unwrap();
        assert_eq!(options.min_score, 0.4);
    }
}
