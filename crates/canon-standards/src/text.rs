//! Text folding shared by the lexicon and the column matcher.

/// Lowercases and drops every character that is not alphanumeric.
///
/// `"Customer ID"`, `"customer_id"` and `"CUSTOMER-ID"` all fold to `"customerid"`.
pub fn compact(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_separators_and_case() {
        assert_eq!(compact("Customer ID"), "customerid");
        assert_eq!(compact("customer_id"), "customerid");
        assert_eq!(compact(" 고객 ID "), "고객id");
        assert_eq!(compact("unit.price/KRW"), "unitpricekrw");
    }
}
