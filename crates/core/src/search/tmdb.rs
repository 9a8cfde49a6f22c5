//! TMDB (The Movie Database) search client.
//!
//! Uses the v3 `/search/movie` endpoint with an API key passed as a query
//! parameter. Calls are paced by a shared [`RequestPacer`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::pacer::RequestPacer;
use super::types::{MatchCandidate, SearchResponse};
use super::{MovieSearch, SearchError};
use crate::config::TmdbConfig;

/// TMDB movie search client. Clones share the HTTP pool and the pacer.
#[derive(Debug, Clone)]
pub struct TmdbSearchClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
    region: String,
    pacer: Arc<RequestPacer>,
}

impl TmdbSearchClient {
    /// Create a new TMDB search client.
    pub fn new(config: &TmdbConfig) -> Result<Self, SearchError> {
        if config.api_key.is_empty() {
            return Err(SearchError::NotConfigured(
                "TMDB API key is required for search".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let delay = Duration::from_millis(config.effective_request_delay_ms());

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            region: config.region.clone(),
            pacer: Arc::new(RequestPacer::new(delay)),
        })
    }

    /// Spacing enforced between consecutive searches.
    pub fn request_delay(&self) -> Duration {
        self.pacer.min_interval()
    }
}

#[async_trait]
impl MovieSearch for TmdbSearchClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn search(&self, title: &str) -> Result<Vec<MatchCandidate>, SearchError> {
        let url = format!("{}/search/movie", self.base_url);

        self.pacer.wait().await;
        debug!("TMDB movie search: query='{}'", title);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", title),
                ("language", self.language.as_str()),
                ("region", self.region.as_str()),
                ("include_adult", "false"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(SearchError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let search_result: SearchResponse = response.json().await.map_err(|e| {
            SearchError::ParseError(format!("Failed to parse movie search response: {}", e))
        })?;

        Ok(search_result
            .results
            .into_iter()
            .enumerate()
            .map(|(rank, r)| r.into_candidate(rank))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use std::time::Instant;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> TmdbConfig {
        TmdbConfig {
            api_key: "test-key".to_string(),
            base_url: server.uri(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_api_key_is_not_configured() {
        let result = TmdbSearchClient::new(&TmdbConfig::default());
        assert!(matches!(result, Err(SearchError::NotConfigured(_))));
    }

    #[test]
    fn test_delay_never_below_minimum() {
        let config = TmdbConfig {
            api_key: "k".to_string(),
            request_delay_ms: 0,
            ..Default::default()
        };
        let client = TmdbSearchClient::new(&config).unwrap();
        assert_eq!(client.request_delay(), Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_search_sends_locale_and_keeps_remote_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("query", "Fight Club"))
            .and(query_param("language", "fr-FR"))
            .and(query_param("region", "FR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::tmdb_search_body(&[
                (550, "Fight Club", "1999-10-15"),
                (14476, "Fight Club: Members Only", "2006-02-17"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = TmdbSearchClient::new(&config(&server)).unwrap();
        let candidates = client.search("Fight Club").await.unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].catalog_id, 550);
        assert_eq!(candidates[0].rank, 0);
        assert_eq!(candidates[0].release_year, Some(1999));
        assert_eq!(candidates[1].catalog_id, 14476);
    }

    #[tokio::test]
    async fn test_empty_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::tmdb_search_body(&[])))
            .mount(&server)
            .await;

        let client = TmdbSearchClient::new(&config(&server)).unwrap();
        assert!(client.search("Nothing Like This").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("query", "unauthorized"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("query", "throttled"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("query", "broken"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("query", "garbled"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = TmdbSearchClient::new(&config(&server)).unwrap();

        assert!(matches!(
            client.search("unauthorized").await,
            Err(SearchError::NotConfigured(_))
        ));
        assert!(matches!(
            client.search("throttled").await,
            Err(SearchError::RateLimited)
        ));
        match client.search("broken").await {
            Err(SearchError::ApiError { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
        assert!(matches!(
            client.search("garbled").await,
            Err(SearchError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_consecutive_searches_are_paced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::tmdb_search_body(&[])))
            .expect(3)
            .mount(&server)
            .await;

        let client = TmdbSearchClient::new(&config(&server)).unwrap();
        let shared = client.clone();

        let start = Instant::now();
        client.search("one").await.unwrap();
        shared.search("two").await.unwrap();
        client.search("three").await.unwrap();

        // Default delay is 250ms, so three calls span at least two gaps
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
