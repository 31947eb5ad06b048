pub mod exact;
pub mod expansion;
pub mod fuzzy;
pub mod normalize;

pub use expansion::KeywordExpander;
pub use fuzzy::{partial_ratio, ScoredCandidate};
pub use normalize::{normalize, tokenize};

use crate::catalog::{Catalog, CatalogItem};
use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_FUZZY_THRESHOLD: u8 = 60;
pub const DEFAULT_MAX_RESULTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Fuzzy candidates must score strictly above this.
    pub fuzzy_threshold: u8,
    pub max_results: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Which pass produced the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Exact,
    Fuzzy,
    /// Neither pass found anything.
    None,
}

#[derive(Debug, Clone)]
pub struct MatchOutcome<'a> {
    pub phase: MatchPhase,
    pub items: Vec<&'a CatalogItem>,
    /// Fuzzy scores, parallel to `items`. Empty for the exact phase.
    pub scores: Vec<u8>,
}

impl<'a> MatchOutcome<'a> {
    fn empty() -> Self {
        Self {
            phase: MatchPhase::None,
            items: Vec::new(),
            scores: Vec::new(),
        }
    }
}

/// Exact-then-fuzzy ranking over a catalog snapshot.
///
/// Holds only configuration; every call works on request-local state and the
/// catalog is borrowed read-only.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatchConfig,
    expander: KeywordExpander,
}

impl Matcher {
    pub fn new(config: MatchConfig, expander: KeywordExpander) -> Self {
        Self { config, expander }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn match_query<'a>(
        &self,
        catalog: &'a Catalog,
        query: &str,
    ) -> Result<MatchOutcome<'a>, SchemaError> {
        catalog.validate_for_matching()?;

        let normalized = normalize(query);
        let tokens = tokenize(&normalized);
        if tokens.is_empty() {
            return Ok(MatchOutcome::empty());
        }
        let items = catalog.all_items();

        let mut exact = exact::exact_matches(items, &normalized);
        if !exact.is_empty() {
            exact.truncate(self.config.max_results);
            debug!(query = %normalized, count = exact.len(), "Exact phase matched");
            return Ok(MatchOutcome {
                phase: MatchPhase::Exact,
                items: exact,
                scores: Vec::new(),
            });
        }

        let terms = self.expander.expand(tokens.as_slice());
        let mut ranked = fuzzy::fuzzy_matches(items, &terms, self.config.fuzzy_threshold);
        ranked.truncate(self.config.max_results);
        debug!(
            query = %normalized,
            terms = terms.len(),
            count = ranked.len(),
            "Fuzzy phase finished"
        );

        if ranked.is_empty() {
            return Ok(MatchOutcome::empty());
        }
        Ok(MatchOutcome {
            phase: MatchPhase::Fuzzy,
            scores: ranked.iter().map(|c| c.score).collect(),
            items: ranked.into_iter().map(|c| c.item).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnMap;

    fn catalog() -> Catalog {
        Catalog::from_items(vec![
            CatalogItem::new("Verify Numerical Reasoning", "Ability & Aptitude"),
            CatalogItem::new("Cognitive Ability Test", "Cognitive"),
            CatalogItem::new("Core Java (Entry Level)", "Knowledge & Skills"),
            CatalogItem::new("Python Programming", "Knowledge & Skills"),
            CatalogItem::new("Sales Personality Test", "Personality & Behavior"),
        ])
    }

    fn names(outcome: &MatchOutcome<'_>) -> Vec<String> {
        outcome
            .items
            .iter()
            .filter_map(|i| i.name.clone())
            .collect()
    }

    #[test]
    fn cognitive_hits_exact_phase_first() {
        let catalog = catalog();
        let outcome = Matcher::default().match_query(&catalog, "Cognitive").unwrap();
        assert_eq!(outcome.phase, MatchPhase::Exact);
        assert_eq!(names(&outcome)[0], "Cognitive Ability Test");
        assert!(outcome.scores.is_empty());
    }

    #[test]
    fn exact_phase_keeps_catalog_order() {
        let catalog = catalog();
        let outcome = Matcher::default().match_query(&catalog, "knowledge").unwrap();
        assert_eq!(
            names(&outcome),
            vec!["Core Java (Entry Level)", "Python Programming"]
        );
    }

    #[test]
    fn fuzzy_phase_uses_expansion() {
        let catalog = catalog();
        let outcome = Matcher::default().match_query(&catalog, "coding").unwrap();
        assert_eq!(outcome.phase, MatchPhase::Fuzzy);
        // "programming" and "test" both come from the synonym table
        assert!(names(&outcome).contains(&"Python Programming".to_string()));
        assert!(names(&outcome).contains(&"Sales Personality Test".to_string()));
        assert_eq!(outcome.scores[0], 100);
        assert!(outcome.scores.iter().all(|s| *s > DEFAULT_FUZZY_THRESHOLD));
        assert!(outcome.scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn empty_query_returns_nothing() {
        let catalog = catalog();
        let outcome = Matcher::default().match_query(&catalog, "").unwrap();
        assert_eq!(outcome.phase, MatchPhase::None);
        assert!(outcome.items.is_empty());
    }

    #[test]
    fn whitespace_only_query_returns_nothing() {
        let catalog = catalog();
        for query in [" ", "\t\n", "   "] {
            let outcome = Matcher::default().match_query(&catalog, query).unwrap();
            assert_eq!(outcome.phase, MatchPhase::None, "query {query:?}");
            assert!(outcome.items.is_empty(), "query {query:?} matched items");
        }
    }

    #[test]
    fn transposed_letters_still_match() {
        let catalog = catalog();
        let outcome = Matcher::default().match_query(&catalog, "slaes").unwrap();
        assert_eq!(outcome.phase, MatchPhase::Fuzzy);
        assert_eq!(names(&outcome)[0], "Sales Personality Test");
        assert_eq!(outcome.scores[0], 80);
    }

    #[test]
    fn no_match_is_not_an_error() {
        let catalog = catalog();
        let outcome = Matcher::default().match_query(&catalog, "zzzzzzzz").unwrap();
        assert_eq!(outcome.phase, MatchPhase::None);
    }

    #[test]
    fn results_are_capped() {
        let items = (0..25)
            .map(|i| CatalogItem::new(&format!("Numerical Test {i}"), "Ability"))
            .collect();
        let catalog = Catalog::from_items(items);
        let outcome = Matcher::default().match_query(&catalog, "numerical").unwrap();
        assert_eq!(outcome.items.len(), DEFAULT_MAX_RESULTS);

        let small = Matcher::new(
            MatchConfig {
                max_results: 3,
                ..MatchConfig::default()
            },
            KeywordExpander::default(),
        );
        assert_eq!(small.match_query(&catalog, "numerical").unwrap().items.len(), 3);
    }

    #[test]
    fn missing_category_column_fails_before_matching() {
        let csv = "Assessment Name\nCognitive Ability Test\n";
        let catalog = Catalog::from_csv_str(csv, &ColumnMap::default()).unwrap();
        let err = Matcher::default().match_query(&catalog, "cognitive").unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumns { .. }));
    }

    #[test]
    fn matching_does_not_touch_the_catalog() {
        let catalog = catalog();
        let before = catalog.all_items().to_vec();
        let _ = Matcher::default().match_query(&catalog, "coding");
        assert_eq!(catalog.all_items(), before.as_slice());
    }
}
