//! Filename to catalog ID resolution.

use std::sync::Arc;
use tracing::debug;

use crate::catalog::CatalogIndex;
use crate::config::StrategyKind;
use crate::normalize::{is_catalog_id, normalize};
use crate::search::{MatchCandidate, MovieSearch};

/// How a run matches titles. Chosen once per run.
#[derive(Clone)]
pub enum MatchStrategy {
    /// Exact lookup of the lower-cased title in the export index.
    ExactIndex(Arc<CatalogIndex>),
    /// Free-text remote search, first result wins.
    FuzzySearch(Arc<dyn MovieSearch>),
}

impl MatchStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            MatchStrategy::ExactIndex(_) => StrategyKind::ExactIndex,
            MatchStrategy::FuzzySearch(_) => StrategyKind::FuzzySearch,
        }
    }
}

impl std::fmt::Debug for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStrategy::ExactIndex(index) => {
                f.debug_tuple("ExactIndex").field(&index.len()).finish()
            }
            MatchStrategy::FuzzySearch(search) => {
                f.debug_tuple("FuzzySearch").field(&search.name()).finish()
            }
        }
    }
}

/// Result of resolving one file stem.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The stem is already a bare catalog ID.
    AlreadyResolved,
    /// Nothing was left after normalization.
    EmptyTitle,
    Matched(MatchCandidate),
    NoMatch { normalized: String },
    /// The remote search failed; the file counts as unmatched.
    SearchFailed(String),
}

/// Resolves raw file stems with a fixed strategy.
#[derive(Debug, Clone)]
pub struct MatchResolver {
    strategy: MatchStrategy,
}

impl MatchResolver {
    pub fn new(strategy: MatchStrategy) -> Self {
        Self { strategy }
    }

    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub async fn resolve(&self, raw_stem: &str) -> Resolution {
        if is_catalog_id(raw_stem) {
            return Resolution::AlreadyResolved;
        }

        let normalized = normalize(raw_stem);
        if normalized.is_empty() {
            return Resolution::EmptyTitle;
        }

        match &self.strategy {
            MatchStrategy::ExactIndex(index) => {
                let key = normalized.to_lowercase();
                match index.lookup(&key) {
                    Some(entry) => {
                        let title = if entry.title.is_empty() {
                            entry.original_title.clone()
                        } else {
                            entry.title.clone()
                        };
                        Resolution::Matched(MatchCandidate::new(entry.id, title))
                    }
                    None => Resolution::NoMatch { normalized },
                }
            }
            MatchStrategy::FuzzySearch(search) => match search.search(&normalized).await {
                Ok(candidates) => match candidates.into_iter().next() {
                    Some(best) => Resolution::Matched(best),
                    None => Resolution::NoMatch { normalized },
                },
                Err(e) => {
                    debug!("Search for '{}' via {} failed: {}", normalized, search.name(), e);
                    Resolution::SearchFailed(e.to_string())
                }
            },
        }
    }
}
