use serde::Serialize;

use crate::config::StrategyKind;
use crate::renamer::RenameOutcome;

/// Outcome for one listed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOutcome {
    pub file_name: String,
    #[serde(flatten)]
    pub outcome: RenameOutcome,
}

/// Summary of a batch run. Outcomes are in listing order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub strategy: StrategyKind,
    pub dry_run: bool,
    pub outcomes: Vec<FileOutcome>,
    /// Renamed files, or files that would have been in dry-run mode.
    pub renamed_count: usize,
    pub skipped_count: usize,
    pub error_count: usize,
    pub total_count: usize,
    /// Recognised video files in the directory after the run.
    pub final_listing: Vec<String>,
}

impl BatchReport {
    pub fn new(
        strategy: StrategyKind,
        dry_run: bool,
        outcomes: Vec<FileOutcome>,
        final_listing: Vec<String>,
    ) -> Self {
        let renamed_count = outcomes.iter().filter(|o| o.outcome.is_renamed()).count();
        let skipped_count = outcomes.iter().filter(|o| o.outcome.is_skipped()).count();
        let error_count = outcomes.iter().filter(|o| o.outcome.is_failed()).count();

        Self {
            strategy,
            dry_run,
            total_count: outcomes.len(),
            outcomes,
            renamed_count,
            skipped_count,
            error_count,
            final_listing,
        }
    }

    /// Failed files, in listing order.
    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.outcome.is_failed())
    }
}
