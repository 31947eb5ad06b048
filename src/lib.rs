pub mod catalog;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod format;
/// Optional Gemini client for the interactive suggestion path; `recommend` never calls it.
pub mod generation;
pub mod search;
pub mod server;

pub use catalog::{Catalog, CatalogHandle, CatalogItem, ColumnMap};
pub use error::{InvalidInputError, LoadError, SchemaError, ServiceError};
pub use evaluation::{evaluate, EvaluationCase};
pub use format::RecommendationResult;
pub use search::{MatchConfig, Matcher};

use search::KeywordExpander;
use tracing::info;

/// The one matcher/formatter pair every host (HTTP, CLI, evaluation) goes
/// through.
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    matcher: Matcher,
}

impl Recommender {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            matcher: Matcher::new(config, KeywordExpander::default()),
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn recommend(
        &self,
        catalog: &Catalog,
        query: &str,
    ) -> Result<Vec<RecommendationResult>, SchemaError> {
        let outcome = self.matcher.match_query(catalog, query)?;
        let results = format::format_results(&outcome.items, self.matcher.config().max_results);
        info!(query, phase = ?outcome.phase, results = results.len(), "Recommendation served");
        Ok(results)
    }
}

/// Match and format with default settings.
pub fn recommend(catalog: &Catalog, query: &str) -> Result<Vec<RecommendationResult>, SchemaError> {
    Recommender::default().recommend(catalog, query)
}
