//! Utility functions for matching operations.

use std::collections::BTreeSet;

pub use canon_standards::compact;

/// Trims whitespace from a column name, preserving the original casing.
pub fn safe_column_name(raw: &str) -> String {
    raw.trim().to_string()
}

/// Splits text into keyword tokens.
///
/// Tokens are runs of alphanumeric characters longer than one character,
/// lowercased. camelCase boundaries also split (`unitPrice` → `unit`, `price`).
pub fn token_set(raw: &str) -> BTreeSet<String> {
    let mut spaced = String::with_capacity(raw.len());
    let mut prev_lower = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if prev_lower && ch.is_uppercase() {
                spaced.push(' ');
            }
            spaced.push(ch);
            prev_lower = ch.is_lowercase();
        } else {
            spaced.push(' ');
            prev_lower = false;
        }
    }
    spaced
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() > 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_set_drops_single_characters() {
        let tokens = token_set("unitPrice_x-2024");
        let expected: BTreeSet<String> = ["unit", "price", "2024"]
            .iter()
            .map(|t| (*t).to_string())
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn token_set_keeps_hangul_runs() {
        let tokens = token_set("판매 수량(개)");
        assert!(tokens.contains("판매"));
        assert!(tokens.contains("수량"));
        assert!(!tokens.contains("개"));
    }
}
