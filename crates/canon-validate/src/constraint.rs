//! Column constraint grammar.
//!
//! Supported rules: `NOT NULL`, `>=N`, `>N`, `<=N`, `<N` with `N` a float.
//! Anything else parses to [`Constraint::Unrecognized`], which always passes.

use std::fmt;

use canon_model::is_missing;
use serde_json::Value;
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    NotNull,
    GreaterOrEqual(f64),
    Greater(f64),
    LessOrEqual(f64),
    Less(f64),
    /// Kept verbatim; treated as satisfied.
    Unrecognized(String),
}

impl Constraint {
    /// Parse a rule string. Never fails.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let upper = trimmed.to_uppercase();
        if upper.split_whitespace().collect::<Vec<_>>() == ["NOT", "NULL"] {
            return Constraint::NotNull;
        }

        // Two-character operators first so `>=` is not read as `>`.
        let operators: [(&str, fn(f64) -> Constraint); 4] = [
            (">=", Constraint::GreaterOrEqual),
            ("<=", Constraint::LessOrEqual),
            (">", Constraint::Greater),
            ("<", Constraint::Less),
        ];
        for (operator, build) in operators {
            if let Some(rest) = trimmed.strip_prefix(operator) {
                return match rest.trim().parse::<f64>() {
                    Ok(bound) if bound.is_finite() => build(bound),
                    _ => Constraint::Unrecognized(trimmed.to_string()),
                };
            }
        }
        Constraint::Unrecognized(trimmed.to_string())
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Constraint::Unrecognized(_))
    }

    /// Check a value.
    ///
    /// Numeric rules pass on missing values (presence is `NOT NULL`'s job)
    /// and fail on values that are not numbers or numeric strings.
    pub fn check(&self, value: &Value) -> bool {
        match self {
            Constraint::NotNull => !is_missing(value),
            Constraint::Unrecognized(_) => true,
            numeric => {
                if is_missing(value) {
                    return true;
                }
                let Some(n) = numeric_value(value) else {
                    return false;
                };
                match numeric {
                    Constraint::GreaterOrEqual(bound) => n >= *bound,
                    Constraint::Greater(bound) => n > *bound,
                    Constraint::LessOrEqual(bound) => n <= *bound,
                    Constraint::Less(bound) => n < *bound,
                    Constraint::NotNull | Constraint::Unrecognized(_) => true,
                }
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::NotNull => f.write_str("NOT NULL"),
            Constraint::GreaterOrEqual(bound) => write!(f, ">={bound}"),
            Constraint::Greater(bound) => write!(f, ">{bound}"),
            Constraint::LessOrEqual(bound) => write!(f, "<={bound}"),
            Constraint::Less(bound) => write!(f, "<{bound}"),
            Constraint::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Check `value` of `field` against a rule string.
pub fn validate(value: &Value, constraint: &str, field: &str) -> bool {
    let passed = Constraint::parse(constraint).check(value);
    if !passed {
        trace!(field, constraint, "constraint failed");
    }
    passed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_grammar() {
        assert_eq!(Constraint::parse("NOT NULL"), Constraint::NotNull);
        assert_eq!(Constraint::parse(" not  null "), Constraint::NotNull);
        assert_eq!(Constraint::parse(">=0"), Constraint::GreaterOrEqual(0.0));
        assert_eq!(Constraint::parse("> 0.5"), Constraint::Greater(0.5));
        assert_eq!(Constraint::parse("<=100"), Constraint::LessOrEqual(100.0));
        assert_eq!(Constraint::parse("<1e3"), Constraint::Less(1000.0));
        assert_eq!(
            Constraint::parse("UNIQUE"),
            Constraint::Unrecognized("UNIQUE".to_string())
        );
        assert_eq!(
            Constraint::parse(">=abc"),
            Constraint::Unrecognized(">=abc".to_string())
        );
    }

    #[test]
    fn display_round_trips() {
        for text in ["NOT NULL", ">=0", ">0", "<=2.5", "<10", "UNIQUE"] {
            assert_eq!(Constraint::parse(text).to_string(), text);
        }
    }

    #[test]
    fn not_null_rejects_missing() {
        assert!(!validate(&json!(null), "NOT NULL", "qty"));
        assert!(!validate(&json!("  "), "NOT NULL", "qty"));
        assert!(validate(&json!(0), "NOT NULL", "qty"));
    }

    #[test]
    fn numeric_rules() {
        assert!(validate(&json!(1), ">0", "qty"));
        assert!(!validate(&json!(0), ">0", "qty"));
        assert!(validate(&json!(0), ">=0", "qty"));
        assert!(!validate(&json!(-0.01), ">=0", "qty"));
        assert!(validate(&json!("5"), "<=5", "qty"));
        assert!(!validate(&json!(5), "<5", "qty"));
    }

    #[test]
    fn numeric_rules_pass_null_and_fail_text() {
        assert!(validate(&json!(null), ">0", "qty"));
        assert!(!validate(&json!("many"), ">0", "qty"));
        assert!(!validate(&json!(true), ">=0", "qty"));
    }

    #[test]
    fn unrecognized_rules_pass() {
        assert!(validate(&json!(null), "UNIQUE", "qty"));
        assert!(validate(&json!("x"), "matches ^a$", "qty"));
    }
}
