//! Remote movie search.
//!
//! Free-text title search against the TMDB search endpoint. The remote
//! service does the ranking; callers take the first candidate.

mod pacer;
mod tmdb;
mod types;

pub use pacer::RequestPacer;
pub use tmdb::TmdbSearchClient;
pub use types::MatchCandidate;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a remote search. Callers treat every variant as "search
/// unavailable" for the file at hand, never as fatal for a batch.
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service throttled us.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing or rejected API key).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// A remote movie search backend.
#[async_trait]
pub trait MovieSearch: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Search by free-text title. Candidates come back in the remote
    /// service's relevance order, best first; an empty list means no match.
    async fn search(&self, title: &str) -> Result<Vec<MatchCandidate>, SearchError>;
}
