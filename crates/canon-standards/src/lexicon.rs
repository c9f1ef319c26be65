//! Synonym table and domain keyword table.
//!
//! A [`Lexicon`] is an immutable value built once and handed to the matcher
//! and the domain detector. Tests can build alternate lexicons from JSON.

use serde::Deserialize;

use crate::embedded::LEXICON_JSON;
use crate::error::{CatalogError, Result};
use crate::text::compact;

/// One domain concept and its equivalent terms, e.g. `customer` / `고객`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymGroup {
    /// Concept key, folded with [`compact`].
    pub concept: String,
    /// Equivalent terms, folded with [`compact`].
    pub terms: Vec<String>,
}

/// Trigger substrings for one domain type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainKeywords {
    pub domain: String,
    /// Lowercased trigger substrings.
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    synonyms: Vec<SynonymGroup>,
    domain_keywords: Vec<DomainKeywords>,
}

#[derive(Deserialize)]
struct RawLexicon {
    #[serde(default)]
    synonyms: Vec<RawSynonymGroup>,
    #[serde(default)]
    domain_keywords: Vec<RawDomainKeywords>,
}

#[derive(Deserialize)]
struct RawSynonymGroup {
    concept: String,
    terms: Vec<String>,
}

#[derive(Deserialize)]
struct RawDomainKeywords {
    domain: String,
    keywords: Vec<String>,
}

impl Lexicon {
    /// Load the built-in lexicon.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON is malformed.
    pub fn load_embedded() -> Result<Self> {
        Self::from_json_str(LEXICON_JSON)
    }

    /// Parse a lexicon from JSON text.
    ///
    /// Terms are folded once here so matching never re-folds dictionary text.
    /// Empty terms, terms contained in their own concept key, and groups
    /// without a concept are dropped.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawLexicon = serde_json::from_str(json).map_err(|source| CatalogError::Parse {
            what: "lexicon",
            source,
        })?;
        let synonyms = raw
            .synonyms
            .into_iter()
            .filter_map(|group| {
                let concept = compact(&group.concept);
                if concept.is_empty() {
                    return None;
                }
                let terms = group
                    .terms
                    .iter()
                    .map(|term| compact(term))
                    .filter(|term| !term.is_empty() && !concept.contains(term.as_str()))
                    .collect();
                Some(SynonymGroup { concept, terms })
            })
            .collect();
        let domain_keywords = raw
            .domain_keywords
            .into_iter()
            .map(|entry| DomainKeywords {
                domain: entry.domain.trim().to_string(),
                keywords: entry
                    .keywords
                    .iter()
                    .map(|keyword| keyword.trim().to_lowercase())
                    .filter(|keyword| !keyword.is_empty())
                    .collect(),
            })
            .collect();
        Ok(Self {
            synonyms,
            domain_keywords,
        })
    }

    pub fn new(synonyms: Vec<SynonymGroup>, domain_keywords: Vec<DomainKeywords>) -> Self {
        Self {
            synonyms,
            domain_keywords,
        }
    }

    pub fn synonyms(&self) -> &[SynonymGroup] {
        &self.synonyms
    }

    /// Domain keyword lists in priority order.
    pub fn domain_keywords(&self) -> &[DomainKeywords] {
        &self.domain_keywords
    }

    /// True if one folded string holds a concept key and the other holds one
    /// of that concept's terms.
    pub fn are_synonymous(&self, left: &str, right: &str) -> bool {
        self.synonyms.iter().any(|group| {
            let crosses = |key_side: &str, term_side: &str| {
                key_side.contains(group.concept.as_str())
                    && group
                        .terms
                        .iter()
                        .any(|term| term_side.contains(term.as_str()))
            };
            crosses(left, right) || crosses(right, left)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_lexicon_loads() {
        let lexicon = Lexicon::load_embedded().unwrap();
        assert!(!lexicon.synonyms().is_empty());
        assert!(!lexicon.domain_keywords().is_empty());
    }

    #[test]
    fn synonyms_cross_languages() {
        let lexicon = Lexicon::load_embedded().unwrap();
        assert!(lexicon.are_synonymous("고객id", "customerid"));
        assert!(lexicon.are_synonymous("customerid", "고객id"));
        assert!(!lexicon.are_synonymous("customerid", "customername"));
        assert!(lexicon.are_synonymous("storeid", "매장코드"));
    }

    #[test]
    fn terms_are_folded() {
        let lexicon = Lexicon::from_json_str(
            r#"{"synonyms": [{"concept": "E-Mail", "terms": ["Mail Address", " ", "mail"]}]}"#,
        )
        .unwrap();
        assert_eq!(lexicon.synonyms()[0].concept, "email");
        assert_eq!(lexicon.synonyms()[0].terms, vec!["mailaddress"]);
        assert!(lexicon.domain_keywords().is_empty());
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = Lexicon::from_json_str("{\"synonyms\": 3}").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { what: "lexicon", .. }));
    }
}
