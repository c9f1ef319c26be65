//! Text similarity and per-column scoring.
//!
//! Similarity between two strings is decided by the first rule that fires:
//!
//! 1. exact after [`compact`] folding → `1.0`
//! 2. containment in either direction → `0.95`
//! 3. lexicon synonym pair → `0.90`
//! 4. weighted token overlap, capped at `1.0`
//!
//! A schema column is scored against a raw header by comparing the header
//! with the column name, its description, and each example alias. The best
//! score wins, then an example bonus of `+0.3` is applied when the header
//! equals or contains an alias.

use std::collections::BTreeSet;
use std::fmt;

use canon_model::ColumnDescriptor;
use canon_standards::Lexicon;
use rapidfuzz::distance::levenshtein;
use serde::{Deserialize, Serialize};

use crate::utils::{compact, token_set};

pub const EXACT_SCORE: f64 = 1.0;
pub const CONTAINMENT_SCORE: f64 = 0.95;
pub const SYNONYM_SCORE: f64 = 0.90;
pub const EXAMPLE_BONUS: f64 = 0.3;

const TOKEN_EXACT_WEIGHT: f64 = 3.0;
const TOKEN_CONTAINMENT_WEIGHT: f64 = 2.0;
const TOKEN_NEAR_WEIGHT: f64 = 1.0;
const TOKEN_SCALE: f64 = 1.5;
/// Maximum normalized edit distance for two tokens to count as near matches.
const NEAR_DISTANCE_RATIO: f64 = 0.3;

/// The similarity rule that produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    Exact,
    Containment,
    Synonym,
    Tokens,
    /// Nothing in common.
    None,
}

impl MatchRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRule::Exact => "exact",
            MatchRule::Containment => "containment",
            MatchRule::Synonym => "synonym",
            MatchRule::Tokens => "tokens",
            MatchRule::None => "none",
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Similarity of two strings with the rule that decided it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    pub score: f64,
    pub rule: MatchRule,
}

impl Similarity {
    const NONE: Similarity = Similarity {
        score: 0.0,
        rule: MatchRule::None,
    };
}

/// Compare two strings.
///
/// Symmetric, and always in `[0, 1]`. Strings that fold to nothing score `0`.
pub fn similarity(lexicon: &Lexicon, left: &str, right: &str) -> Similarity {
    let a = compact(left);
    let b = compact(right);
    if a.is_empty() || b.is_empty() {
        return Similarity::NONE;
    }
    if a == b {
        return Similarity {
            score: EXACT_SCORE,
            rule: MatchRule::Exact,
        };
    }
    if a.contains(b.as_str()) || b.contains(a.as_str()) {
        return Similarity {
            score: CONTAINMENT_SCORE,
            rule: MatchRule::Containment,
        };
    }
    if lexicon.are_synonymous(&a, &b) {
        return Similarity {
            score: SYNONYM_SCORE,
            rule: MatchRule::Synonym,
        };
    }
    let score = token_score(&token_set(left), &token_set(right));
    if score > 0.0 {
        Similarity {
            score,
            rule: MatchRule::Tokens,
        }
    } else {
        Similarity::NONE
    }
}

/// Weighted token overlap.
///
/// Every token of the larger set is paired with its best partner in the other
/// set: exact `3`, containment `2`, near spelling `1`. The total is divided by
/// the best possible weight and scaled by `1.5`.
pub fn token_score(left: &BTreeSet<String>, right: &BTreeSet<String>) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let (larger, smaller) = if left.len() >= right.len() {
        (left, right)
    } else {
        (right, left)
    };
    let total: f64 = larger
        .iter()
        .map(|token| {
            smaller
                .iter()
                .map(|other| token_weight(token, other))
                .fold(0.0, f64::max)
        })
        .sum();
    let best = larger.len() as f64 * TOKEN_EXACT_WEIGHT;
    (total / best * TOKEN_SCALE).min(1.0)
}

fn token_weight(token: &str, other: &str) -> f64 {
    if token == other {
        return TOKEN_EXACT_WEIGHT;
    }
    if token.contains(other) || other.contains(token) {
        return TOKEN_CONTAINMENT_WEIGHT;
    }
    let longest = token.chars().count().max(other.chars().count());
    if longest == 0 {
        return 0.0;
    }
    let distance = levenshtein::distance(token.chars(), other.chars());
    if (distance as f64) / (longest as f64) < NEAR_DISTANCE_RATIO {
        TOKEN_NEAR_WEIGHT
    } else {
        0.0
    }
}

/// Score for a single raw-header / schema-column pair.
#[derive(Debug, Clone)]
pub struct ColumnScore {
    /// Final score in `[0, 1]`.
    pub score: f64,
    /// Rule that produced the best base similarity.
    pub rule: MatchRule,
    /// Breakdown of score components for explainability.
    pub explanation: Vec<ScoreComponent>,
}

impl ColumnScore {
    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        self.explanation
            .iter()
            .map(|c| format!("{}: {:.0}% ({})", c.name, c.value * 100.0, c.description))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A component contributing to the final score.
#[derive(Debug, Clone)]
pub struct ScoreComponent {
    /// Component name (e.g., "Best similarity").
    pub name: &'static str,
    pub value: f64,
    pub description: String,
}

/// Score a raw header against one schema column.
pub fn score_column(lexicon: &Lexicon, raw: &str, column: &ColumnDescriptor) -> ColumnScore {
    let folded_raw = compact(raw);
    if folded_raw.is_empty() {
        return ColumnScore {
            score: 0.0,
            rule: MatchRule::None,
            explanation: vec![ScoreComponent {
                name: "Empty header",
                value: 0.0,
                description: format!("'{raw}' has no letters or digits"),
            }],
        };
    }

    let targets = std::iter::once(("name", column.name.as_str()))
        .chain(
            (!column.description.trim().is_empty())
                .then_some(("description", column.description.as_str())),
        )
        .chain(column.examples.iter().map(|e| ("example", e.as_str())));

    let mut best = Similarity::NONE;
    let mut best_target = ("name", column.name.as_str());
    for (kind, target) in targets {
        let current = similarity(lexicon, raw, target);
        if current.score > best.score {
            best = current;
            best_target = (kind, target);
        }
    }

    let mut explanation = vec![ScoreComponent {
        name: "Best similarity",
        value: best.score,
        description: format!("{} rule against {} '{}'", best.rule, best_target.0, best_target.1),
    }];

    let mut score = best.score;
    if let Some(alias) = column.examples.iter().find(|example| {
        let folded = compact(example);
        !folded.is_empty() && folded_raw.contains(folded.as_str())
    }) {
        score = (score + EXAMPLE_BONUS).min(1.0);
        explanation.push(ScoreComponent {
            name: "Example bonus",
            value: EXAMPLE_BONUS,
            description: format!("header contains alias '{alias}'"),
        });
    }

    ColumnScore {
        score,
        rule: best.rule,
        explanation,
    }
}
