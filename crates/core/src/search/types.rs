use serde::{Deserialize, Serialize};

/// A catalog ID proposed for a file, with its position in the result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub catalog_id: u64,
    /// 0 is the best candidate.
    pub rank: usize,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
}

impl MatchCandidate {
    pub fn new(catalog_id: u64, title: impl Into<String>) -> Self {
        Self {
            catalog_id,
            rank: 0,
            title: title.into(),
            release_year: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.release_year = Some(year);
        self
    }
}

impl std::fmt::Display for MatchCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.release_year {
            Some(year) => write!(f, "\"{}\" ({}) id={}", self.title, year, self.catalog_id),
            None => write!(f, "\"{}\" id={}", self.title, self.catalog_id),
        }
    }
}

/// Raw TMDB `/search/movie` response.
#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchResult {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl SearchResult {
    pub fn into_candidate(self, rank: usize) -> MatchCandidate {
        // release_date is "YYYY-MM-DD" or an empty string for unreleased titles
        let release_year = self
            .release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok());

        let title = self
            .title
            .filter(|t| !t.is_empty())
            .or(self.original_title)
            .unwrap_or_default();

        MatchCandidate {
            catalog_id: self.id,
            rank,
            title,
            release_year,
        }
    }
}
