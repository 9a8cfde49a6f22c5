//! Mock movie search for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::search::{MatchCandidate, MovieSearch, SearchError};

/// A recorded search for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    /// The title that was searched.
    pub query: String,
    /// When the search was made.
    pub timestamp: Instant,
}

/// A query handler that produces results dynamically based on the query.
type QueryHandler = Box<dyn Fn(&str) -> Option<Vec<MatchCandidate>> + Send + Sync>;

/// Mock implementation of the MovieSearch trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable results per query
/// - Track queries for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// use netflox_core::testing::MockMovieSearch;
///
/// let search = MockMovieSearch::new();
/// search.set_results("Fight Club", vec![MatchCandidate::new(550, "Fight Club")]).await;
///
/// let found = search.search("Fight Club").await?;
/// assert_eq!(found[0].catalog_id, 550);
/// assert_eq!(search.recorded_queries().await, vec!["Fight Club"]);
/// ```
pub struct MockMovieSearch {
    /// Results by exact query.
    results: Arc<RwLock<HashMap<String, Vec<MatchCandidate>>>>,
    /// Returned for queries with no configured results.
    default_results: Arc<RwLock<Vec<MatchCandidate>>>,
    /// Recorded searches.
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<SearchError>>>,
    /// Query handler, consulted before the configured results.
    query_handler: Arc<RwLock<Option<QueryHandler>>>,
}

impl std::fmt::Debug for MockMovieSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockMovieSearch")
            .field("results", &"<results>")
            .field("searches", &"<searches>")
            .field("next_error", &"<next_error>")
            .field("query_handler", &"<handler>")
            .finish()
    }
}

impl Default for MockMovieSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMovieSearch {
    /// Create a new mock that finds nothing.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(HashMap::new())),
            default_results: Arc::new(RwLock::new(Vec::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            query_handler: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the results returned for an exact query.
    pub async fn set_results(&self, query: &str, results: Vec<MatchCandidate>) {
        self.results.write().await.insert(query.to_string(), results);
    }

    /// Set the results returned for any query without its own results.
    pub async fn set_default_results(&self, results: Vec<MatchCandidate>) {
        *self.default_results.write().await = results;
    }

    /// Get recorded searches.
    pub async fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    /// Get the recorded query strings, in call order.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.searches
            .read()
            .await
            .iter()
            .map(|s| s.query.clone())
            .collect()
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: SearchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set a handler that can answer queries dynamically. Returning `None`
    /// falls through to the configured results.
    pub async fn set_query_handler<F>(&self, handler: F)
    where
        F: Fn(&str) -> Option<Vec<MatchCandidate>> + Send + Sync + 'static,
    {
        *self.query_handler.write().await = Some(Box::new(handler));
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<SearchError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl MovieSearch for MockMovieSearch {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, title: &str) -> Result<Vec<MatchCandidate>, SearchError> {
        self.searches.write().await.push(RecordedSearch {
            query: title.to_string(),
            timestamp: Instant::now(),
        });

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        if let Some(ref handler) = *self.query_handler.read().await {
            if let Some(results) = handler(title) {
                return Ok(results);
            }
        }

        if let Some(results) = self.results.read().await.get(title) {
            return Ok(results.clone());
        }

        Ok(self.default_results.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_per_query_and_default_results() {
        let search = MockMovieSearch::new();
        search
            .set_results("Heat", vec![MatchCandidate::new(949, "Heat")])
            .await;
        search
            .set_default_results(vec![MatchCandidate::new(1, "Anything")])
            .await;

        assert_eq!(search.search("Heat").await.unwrap()[0].catalog_id, 949);
        assert_eq!(search.search("Other").await.unwrap()[0].catalog_id, 1);
        assert_eq!(search.recorded_queries().await, vec!["Heat", "Other"]);
    }

    #[tokio::test]
    async fn test_next_error_is_consumed_once() {
        let search = MockMovieSearch::new();
        search.set_next_error(SearchError::RateLimited).await;

        assert!(search.search("a").await.is_err());
        assert!(search.search("a").await.unwrap().is_empty());
        assert_eq!(search.search_count().await, 2);
    }

    #[tokio::test]
    async fn test_query_handler_overrides() {
        let search = MockMovieSearch::new();
        search
            .set_query_handler(|q| q.starts_with("Alien").then(|| vec![MatchCandidate::new(348, "Alien")]))
            .await;

        assert_eq!(search.search("Alien Romulus").await.unwrap()[0].catalog_id, 348);
        assert!(search.search("Aliens").await.unwrap()[0].catalog_id == 348);
        assert!(search.search("Heat").await.unwrap().is_empty());
    }
}
