//! Applies resolved IDs to files on disk.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;
use tracing::{debug, warn};

use super::types::{FailReason, RawFileEntry, RenameOutcome};
use crate::search::MatchCandidate;

/// Renames files to `{catalog_id}{extension}`.
///
/// Targets claimed during the run are remembered, so two files resolving to
/// the same ID get the same outcome in dry-run mode as in a real run, and
/// concurrent callers never race for one name.
#[derive(Debug, Default)]
pub struct RenameExecutor {
    dry_run: bool,
    claimed: Mutex<HashSet<PathBuf>>,
}

impl RenameExecutor {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            claimed: Mutex::new(HashSet::new()),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub async fn apply(&self, entry: &RawFileEntry, candidate: &MatchCandidate) -> RenameOutcome {
        let target = entry.target_path(candidate.catalog_id);

        if !self.claim(&target) {
            debug!("{} already claimed earlier in this run", target.display());
            return RenameOutcome::failed(FailReason::TargetExists);
        }

        match fs::try_exists(&target).await {
            Ok(true) => return RenameOutcome::failed(FailReason::TargetExists),
            Ok(false) => {}
            Err(e) => {
                self.release(&target);
                return RenameOutcome::failed(FailReason::Io(e.to_string()));
            }
        }

        if self.dry_run {
            return RenameOutcome::DryRun {
                from: entry.path.clone(),
                to: target,
            };
        }

        match fs::rename(&entry.path, &target).await {
            Ok(()) => {
                debug!("Renamed {} -> {}", entry.path.display(), target.display());
                RenameOutcome::Renamed {
                    from: entry.path.clone(),
                    to: target,
                }
            }
            Err(e) => {
                warn!("Failed to rename {}: {}", entry.path.display(), e);
                self.release(&target);
                RenameOutcome::failed(FailReason::Io(e.to_string()))
            }
        }
    }

    /// Returns false when the target was already claimed.
    fn claim(&self, target: &Path) -> bool {
        match self.claimed.lock() {
            Ok(mut claimed) => claimed.insert(target.to_path_buf()),
            Err(poisoned) => poisoned.into_inner().insert(target.to_path_buf()),
        }
    }

    fn release(&self, target: &Path) {
        match self.claimed.lock() {
            Ok(mut claimed) => claimed.remove(target),
            Err(poisoned) => poisoned.into_inner().remove(target),
        };
    }
}
