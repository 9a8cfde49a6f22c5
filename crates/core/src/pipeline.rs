//! One rename run, from configuration to report.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::batch::{BatchReport, BatchRunner};
use crate::catalog::{CatalogLoadError, ExportFetcher};
use crate::config::{Config, ConfigError, StrategyKind};
use crate::renamer::RenameExecutor;
use crate::resolver::{MatchResolver, MatchStrategy};
use crate::search::{MovieSearch, SearchError, TmdbSearchClient};

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    CatalogLoad(#[from] CatalogLoadError),

    #[error("Cannot access video directory {}: {source}", .path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Search client unavailable: {0}")]
    SearchClient(#[source] SearchError),
}

impl PipelineError {
    /// Name of the failed stage, for the operator.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::CatalogLoad(e) => e.stage(),
            Self::DirectoryAccess { .. } => "directory-access",
            Self::SearchClient(_) => "search-client",
        }
    }
}

/// Per-run overrides of the configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub strategy: Option<StrategyKind>,
    pub videos_dir: Option<PathBuf>,
    pub concurrency: Option<usize>,
}

/// A configured rename run. The strategy is fixed at construction.
pub struct RenamePipeline {
    runner: BatchRunner,
    videos_dir: PathBuf,
    create_if_missing: bool,
}

impl RenamePipeline {
    /// Build a pipeline from configuration.
    ///
    /// For the exact index strategy this downloads and indexes the export,
    /// which can take a while and fails the whole run on error.
    pub async fn from_config(config: &Config, options: RunOptions) -> Result<Self, PipelineError> {
        let kind = options.strategy.unwrap_or(config.renamer.strategy);

        let strategy = match kind {
            StrategyKind::ExactIndex => {
                let fetcher =
                    ExportFetcher::from_config(&config.tmdb, config.renamer.temp_dir.clone())?;
                info!("Loading catalog export from {}", fetcher.url());
                let index = fetcher.load().await?;
                MatchStrategy::ExactIndex(Arc::new(index))
            }
            StrategyKind::FuzzySearch => {
                let client =
                    TmdbSearchClient::new(&config.tmdb).map_err(PipelineError::SearchClient)?;
                MatchStrategy::FuzzySearch(Arc::new(client))
            }
        };

        let videos_dir = options
            .videos_dir
            .clone()
            .unwrap_or_else(|| config.library.videos_dir.clone());

        Ok(Self::with_strategy(strategy, config, videos_dir, &options))
    }

    /// Build a fuzzy search pipeline around any search backend.
    pub fn with_search(
        search: Arc<dyn MovieSearch>,
        config: &Config,
        options: RunOptions,
    ) -> Self {
        let videos_dir = options
            .videos_dir
            .clone()
            .unwrap_or_else(|| config.library.videos_dir.clone());
        Self::with_strategy(MatchStrategy::FuzzySearch(search), config, videos_dir, &options)
    }

    fn with_strategy(
        strategy: MatchStrategy,
        config: &Config,
        videos_dir: PathBuf,
        options: &RunOptions,
    ) -> Self {
        let concurrency = options.concurrency.unwrap_or(config.renamer.concurrency);
        let runner = BatchRunner::new(
            MatchResolver::new(strategy),
            RenameExecutor::new(options.dry_run),
            &config.library.extensions,
        )
        .with_concurrency(concurrency);

        Self {
            runner,
            videos_dir,
            create_if_missing: config.library.create_if_missing,
        }
    }

    pub fn videos_dir(&self) -> &PathBuf {
        &self.videos_dir
    }

    /// Run the batch over the configured directory.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<BatchReport, PipelineError> {
        if self.create_if_missing {
            tokio::fs::create_dir_all(&self.videos_dir)
                .await
                .map_err(|source| PipelineError::DirectoryAccess {
                    path: self.videos_dir.clone(),
                    source,
                })?;
        }

        self.runner.run(&self.videos_dir, cancel).await
    }
}
