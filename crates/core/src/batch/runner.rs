//! Drives the resolver and executor over a directory.

use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::report::{BatchReport, FileOutcome};
use crate::config::StrategyKind;
use crate::pipeline::PipelineError;
use crate::renamer::{FailReason, RawFileEntry, RenameExecutor, RenameOutcome, SkipReason};
use crate::resolver::{MatchResolver, Resolution};

/// Runs one batch over a directory.
///
/// Fuzzy search runs strictly one file at a time so the search pacing holds.
/// Exact index runs process up to `concurrency` files at once; outcomes are
/// still reported in listing order.
pub struct BatchRunner {
    resolver: MatchResolver,
    executor: Arc<RenameExecutor>,
    /// Lower-cased, with leading dot.
    extensions: Vec<String>,
    concurrency: usize,
}

impl BatchRunner {
    pub fn new(resolver: MatchResolver, executor: RenameExecutor, extensions: &[String]) -> Self {
        Self {
            resolver,
            executor: Arc::new(executor),
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
            concurrency: 1,
        }
    }

    /// Parallelism for the exact index strategy. Ignored for fuzzy search.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn run(
        &self,
        dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<BatchReport, PipelineError> {
        let entries = self
            .list(dir)
            .await
            .map_err(|source| PipelineError::DirectoryAccess {
                path: dir.to_path_buf(),
                source,
            })?;

        let strategy = self.resolver.kind();
        info!(
            "Processing {} video files in {} ({} strategy{})",
            entries.len(),
            dir.display(),
            strategy,
            if self.executor.is_dry_run() { ", dry run" } else { "" }
        );

        let outcomes = match strategy {
            StrategyKind::FuzzySearch => {
                let mut outcomes = Vec::with_capacity(entries.len());
                for entry in &entries {
                    outcomes.push(self.process_unless_cancelled(entry, cancel).await);
                }
                outcomes
            }
            StrategyKind::ExactIndex => {
                stream::iter(entries.iter().map(|e| self.process_unless_cancelled(e, cancel)))
                    .buffered(self.concurrency)
                    .collect::<Vec<_>>()
                    .await
            }
        };

        let final_listing = match self.list(dir).await {
            Ok(entries) => entries.iter().map(RawFileEntry::file_name).collect(),
            Err(e) => {
                warn!("Failed to list {} after the run: {}", dir.display(), e);
                Vec::new()
            }
        };

        let report = BatchReport::new(
            strategy,
            self.executor.is_dry_run(),
            outcomes,
            final_listing,
        );
        info!(
            "Batch complete: {} renamed, {} skipped, {} failed, {} total",
            report.renamed_count, report.skipped_count, report.error_count, report.total_count
        );
        for name in &report.final_listing {
            info!("  {}", name);
        }

        Ok(report)
    }

    async fn process_unless_cancelled(
        &self,
        entry: &RawFileEntry,
        cancel: &CancellationToken,
    ) -> FileOutcome {
        let outcome = if cancel.is_cancelled() {
            RenameOutcome::skipped(SkipReason::Cancelled)
        } else {
            self.process(entry).await
        };

        let file_name = entry.file_name();
        match &outcome {
            RenameOutcome::Failed { reason } => {
                info!("{}: failed", file_name);
                debug!("{}: {}", file_name, reason);
            }
            RenameOutcome::Skipped {
                reason: SkipReason::Cancelled,
            } => debug!("{}: {}", file_name, outcome),
            _ => info!("{}: {}", file_name, outcome),
        }

        FileOutcome { file_name, outcome }
    }

    async fn process(&self, entry: &RawFileEntry) -> RenameOutcome {
        if !entry.utf8_name {
            warn!("{}: file name is not valid UTF-8", entry.path.display());
            return RenameOutcome::failed(FailReason::Io(
                "file name is not valid UTF-8".to_string(),
            ));
        }

        match self.resolver.resolve(&entry.raw_stem).await {
            Resolution::AlreadyResolved => RenameOutcome::skipped(SkipReason::AlreadyResolved),
            Resolution::EmptyTitle => RenameOutcome::skipped(SkipReason::EmptyTitle),
            Resolution::NoMatch { normalized } => {
                debug!("No match for '{}'", normalized);
                RenameOutcome::failed(FailReason::NoMatch)
            }
            Resolution::SearchFailed(msg) => {
                RenameOutcome::failed(FailReason::SearchUnavailable(msg))
            }
            Resolution::Matched(candidate) => {
                debug!("Found {} for {}", candidate, entry.file_name());
                self.executor.apply(entry, &candidate).await
            }
        }
    }

    /// Regular files with a recognised extension, sorted by name.
    async fn list(&self, dir: &Path) -> Result<Vec<RawFileEntry>, std::io::Error> {
        let mut read_dir = tokio::fs::read_dir(dir).await?;
        let mut entries = Vec::new();

        while let Some(dir_entry) = read_dir.next_entry().await? {
            let path = dir_entry.path();
            let Some(entry) = RawFileEntry::from_path(&path) else {
                continue;
            };
            if !self.extensions.contains(&entry.extension.to_lowercase()) {
                continue;
            }
            // Follows symlinks, so a link to a video counts as a video
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => entries.push(entry),
                Ok(_) => {}
                Err(e) => debug!("Skipping unreadable entry {}: {}", path.display(), e),
            }
        }

        entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(entries)
    }
}
