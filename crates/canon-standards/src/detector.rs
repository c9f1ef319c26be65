//! Domain detection from a free-text label such as a file name.

use crate::lexicon::Lexicon;
use crate::registry::SchemaRegistry;

/// Domain type returned when no keyword matches.
pub const OTHER_DOMAIN: &str = "other";

/// Keyword-based domain detector.
///
/// Matching is case-insensitive substring containment over the lexicon's
/// keyword lists, checked in priority order. The first domain with a hit
/// wins. Detection never fails; [`OTHER_DOMAIN`] is a valid outcome.
#[derive(Debug, Clone, Copy)]
pub struct DomainDetector<'a> {
    lexicon: &'a Lexicon,
    registry: Option<&'a SchemaRegistry>,
}

impl<'a> DomainDetector<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self {
            lexicon,
            registry: None,
        }
    }

    /// Also resolve labels that name a registered schema type exactly.
    #[must_use]
    pub fn with_registry(mut self, registry: &'a SchemaRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn detect(&self, label: &str) -> String {
        let lowered = label.trim().to_lowercase();
        if lowered.is_empty() {
            return OTHER_DOMAIN.to_string();
        }
        if let Some(registry) = self.registry
            && registry.contains(&lowered)
        {
            return lowered;
        }
        for entry in self.lexicon.domain_keywords() {
            if entry.domain.eq_ignore_ascii_case(&lowered) {
                return entry.domain.clone();
            }
        }
        for entry in self.lexicon.domain_keywords() {
            if let Some(keyword) = entry
                .keywords
                .iter()
                .find(|keyword| lowered.contains(keyword.as_str()))
            {
                tracing::debug!(label, domain = %entry.domain, keyword = %keyword, "domain detected");
                return entry.domain.clone();
            }
        }
        tracing::debug!(label, "no domain keyword matched");
        OTHER_DOMAIN.to_string()
    }
}
