//! Download and decoding of the TMDB daily export.

use chrono::{Days, NaiveDate, Utc};
use futures::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use super::index::CatalogIndex;
use super::CatalogLoadError;
use crate::config::TmdbConfig;

/// Where TMDB publishes its daily ID exports.
pub const EXPORT_BASE_URL: &str = "https://files.tmdb.org/p/exports";

const EXPORT_FILE_NAME: &str = "movie_ids.json.gz";

/// URL of the movie ID export published for `date`.
pub fn default_export_url(date: NaiveDate) -> String {
    format!(
        "{}/movie_ids_{}.json.gz",
        EXPORT_BASE_URL,
        date.format("%m_%d_%Y")
    )
}

/// Fetches the export into a private working directory and indexes it.
#[derive(Debug, Clone)]
pub struct ExportFetcher {
    client: Client,
    url: String,
    work_parent: Option<PathBuf>,
}

impl ExportFetcher {
    /// Create a fetcher for an explicit export URL.
    ///
    /// `timeout` bounds connecting and each read, not the whole transfer, so
    /// large exports on slow links still complete.
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        work_parent: Option<PathBuf>,
    ) -> Result<Self, CatalogLoadError> {
        let url = url.into();
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|source| CatalogLoadError::Fetch {
                url: url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            url,
            work_parent,
        })
    }

    /// Create a fetcher from TMDB settings. Without an explicit `export_url`
    /// the export dated yesterday (UTC) is used, since today's may not be
    /// published yet.
    pub fn from_config(
        tmdb: &TmdbConfig,
        work_parent: Option<PathBuf>,
    ) -> Result<Self, CatalogLoadError> {
        let url = match &tmdb.export_url {
            Some(url) => url.clone(),
            None => {
                let today = Utc::now().date_naive();
                let date = today.checked_sub_days(Days::new(1)).unwrap_or(today);
                default_export_url(date)
            }
        };
        Self::new(url, Duration::from_secs(tmdb.timeout_secs), work_parent)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download, decompress and index the export.
    ///
    /// The working directory is removed afterwards whether or not loading
    /// succeeded; a failed removal is only logged.
    pub async fn load(&self) -> Result<CatalogIndex, CatalogLoadError> {
        let workspace = match &self.work_parent {
            Some(parent) => {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(CatalogLoadError::Workspace)?;
                tempfile::Builder::new()
                    .prefix("netflox-export-")
                    .tempdir_in(parent)
            }
            None => tempfile::Builder::new().prefix("netflox-export-").tempdir(),
        }
        .map_err(CatalogLoadError::Workspace)?;

        let workspace_path = workspace.path().to_path_buf();
        let result = self.load_in(&workspace_path).await;

        if let Err(e) = workspace.close() {
            warn!(
                "Failed to remove export working directory {}: {}",
                workspace_path.display(),
                e
            );
        }

        result
    }

    async fn load_in(&self, workspace: &Path) -> Result<CatalogIndex, CatalogLoadError> {
        let start = Instant::now();
        let archive = workspace.join(EXPORT_FILE_NAME);

        let bytes = self.download(&archive).await?;
        info!(
            "Downloaded catalog export ({} bytes) in {:.1}s",
            bytes,
            start.elapsed().as_secs_f32()
        );

        let index = tokio::task::spawn_blocking(move || {
            let file = std::fs::File::open(&archive)?;
            CatalogIndex::from_gzip_reader(std::io::BufReader::new(file))
        })
        .await
        .map_err(|e| CatalogLoadError::Decompress(std::io::Error::other(e.to_string())))??;

        let stats = index.stats();
        info!(
            "Catalog index ready: {} entries, {} titles, {} malformed lines skipped ({:.1}s)",
            index.len(),
            index.key_count(),
            stats.malformed_lines,
            start.elapsed().as_secs_f32()
        );

        Ok(index)
    }

    /// Stream the response body to `dest` chunk by chunk.
    async fn download(&self, dest: &Path) -> Result<u64, CatalogLoadError> {
        debug!("Fetching catalog export from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| CatalogLoadError::Fetch {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogLoadError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let mut writer = BufWriter::new(File::create(dest).await?);
        let mut stream = response.bytes_stream();
        let mut total = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| CatalogLoadError::Fetch {
                url: self.url.clone(),
                source,
            })?;
            writer.write_all(&chunk).await?;
            total += chunk.len() as u64;
        }
        writer.flush().await?;

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(url: String, parent: &Path) -> ExportFetcher {
        ExportFetcher::new(url, Duration::from_secs(5), Some(parent.to_path_buf())).unwrap()
    }

    fn dir_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[test]
    fn test_default_export_url() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 12).unwrap();
        assert_eq!(
            default_export_url(date),
            "https://files.tmdb.org/p/exports/movie_ids_07_12_2024.json.gz"
        );
    }

    #[test]
    fn test_from_config_prefers_explicit_url() {
        let tmdb = TmdbConfig {
            export_url: Some("http://localhost/export.json.gz".to_string()),
            ..Default::default()
        };
        let fetcher = ExportFetcher::from_config(&tmdb, None).unwrap();
        assert_eq!(fetcher.url(), "http://localhost/export.json.gz");

        let dated = ExportFetcher::from_config(&TmdbConfig::default(), None).unwrap();
        assert!(dated.url().starts_with(EXPORT_BASE_URL));
    }

    #[tokio::test]
    async fn test_load_builds_index_and_cleans_up() {
        let server = MockServer::start().await;
        let body = fixtures::gzip_export(&[
            fixtures::export_line(550, "Fight Club"),
            "{broken".to_string(),
            fixtures::export_line(603, "The Matrix"),
        ]);
        Mock::given(method("GET"))
            .and(path("/movie_ids.json.gz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&server)
            .await;

        let parent = TempDir::new().unwrap();
        let fetcher = fetcher(format!("{}/movie_ids.json.gz", server.uri()), parent.path());

        let index = fetcher.load().await.unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.stats().malformed_lines, 1);
        assert_eq!(index.lookup("the matrix").map(|e| e.id), Some(603));

        assert!(dir_is_empty(parent.path()));
    }

    #[tokio::test]
    async fn test_http_error_is_fetch_stage_and_cleans_up() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let parent = TempDir::new().unwrap();
        let fetcher = fetcher(format!("{}/missing.json.gz", server.uri()), parent.path());

        let err = fetcher.load().await.unwrap_err();
        assert!(matches!(err, CatalogLoadError::HttpStatus { status: 404, .. }));
        assert_eq!(err.stage(), "fetch");
        assert!(dir_is_empty(parent.path()));
    }

    #[tokio::test]
    async fn test_non_gzip_body_is_decompress_stage() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let parent = TempDir::new().unwrap();
        let fetcher = fetcher(format!("{}/export.json.gz", server.uri()), parent.path());

        let err = fetcher.load().await.unwrap_err();
        assert_eq!(err.stage(), "decompress");
        assert!(dir_is_empty(parent.path()));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let parent = TempDir::new().unwrap();
        // Port 9 (discard) on localhost is essentially never listening
        let fetcher = fetcher("http://127.0.0.1:9/export.json.gz".to_string(), parent.path());

        let err = fetcher.load().await.unwrap_err();
        assert!(matches!(err, CatalogLoadError::Fetch { .. }));
    }
}
