//! Renaming matched video files to their catalog ID.
//!
//! A matched file `Fight.Club.1999.1080p.mkv` becomes `550.mkv` in the same
//! directory. Renames are single `rename(2)` calls and never overwrite: an
//! occupied target name is reported as a failure and both files are left as
//! they were.

mod executor;
mod types;

pub use executor::RenameExecutor;
pub use types::{FailReason, RawFileEntry, RenameOutcome, SkipReason};
