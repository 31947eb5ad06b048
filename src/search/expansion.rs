use std::collections::{BTreeSet, HashMap};

/// Built-in synonym table: a query token on the left pulls in every token on
/// the right.
const DEFAULT_SYNONYMS: &[(&str, &[&str])] = &[
    ("coding", &["programming", "developer", "test", "technical"]),
    ("programming", &["coding", "developer", "technical"]),
    ("developer", &["programming", "coding", "software", "technical"]),
    ("software", &["developer", "programming", "technical"]),
    ("java", &["programming", "developer", "technical"]),
    ("python", &["programming", "developer", "technical"]),
    ("sales", &["selling", "customer", "negotiation"]),
    ("leadership", &["leader", "manager", "management"]),
    ("manager", &["management", "leadership"]),
    ("cognitive", &["reasoning", "aptitude", "ability"]),
    ("aptitude", &["cognitive", "reasoning", "ability"]),
    ("personality", &["behavior", "behaviour", "traits"]),
    ("communication", &["verbal", "english", "language"]),
    ("customer", &["service", "support"]),
    ("admin", &["administrative", "clerical", "office"]),
];

/// Deterministic token enrichment before fuzzy scoring.
///
/// Expansion only adds: every input token is part of its own output.
#[derive(Debug, Clone)]
pub struct KeywordExpander {
    synonyms: HashMap<String, Vec<String>>,
}

impl Default for KeywordExpander {
    fn default() -> Self {
        Self::from_table(DEFAULT_SYNONYMS)
    }
}

impl KeywordExpander {
    pub fn from_table(table: &[(&str, &[&str])]) -> Self {
        let synonyms = table
            .iter()
            .map(|(token, related)| {
                (
                    token.to_string(),
                    related.iter().map(|r| r.to_string()).collect(),
                )
            })
            .collect();
        Self { synonyms }
    }

    /// Tokens plus all their related tokens. Sorted, so iteration order does
    /// not depend on input order.
    pub fn expand<S: AsRef<str>>(&self, tokens: &[S]) -> BTreeSet<String> {
        let mut expanded = BTreeSet::new();
        for token in tokens {
            let token = token.as_ref();
            expanded.insert(token.to_string());
            if let Some(related) = self.synonyms.get(token) {
                expanded.extend(related.iter().cloned());
            }
        }
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coding_pulls_in_related_terms() {
        let expanded = KeywordExpander::default().expand(&["coding"]);
        for term in ["coding", "programming", "developer", "test", "technical"] {
            assert!(expanded.contains(term), "missing {term}");
        }
    }

    #[test]
    fn unknown_tokens_contribute_only_themselves() {
        let expanded = KeywordExpander::default().expand(&["zebra"]);
        assert_eq!(expanded.into_iter().collect::<Vec<_>>(), vec!["zebra"]);
    }

    #[test]
    fn order_does_not_matter() {
        let expander = KeywordExpander::default();
        assert_eq!(
            expander.expand(&["sales", "coding"]),
            expander.expand(&["coding", "sales"])
        );
    }

    #[test]
    fn empty_input_expands_to_nothing() {
        let none: [&str; 0] = [];
        assert!(KeywordExpander::default().expand(&none).is_empty());
    }

    #[test]
    fn custom_table() {
        const TABLE: &[(&str, &[&str])] = &[("qa", &["quality", "testing"])];
        let expander = KeywordExpander::from_table(TABLE);
        let expanded = expander.expand(&["qa".to_string()]);
        assert_eq!(expanded.len(), 3);
        assert!(expanded.contains("testing"));
    }
}
