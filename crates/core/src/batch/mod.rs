//! Batch renaming of a video directory.
//!
//! The directory is listed once, then every recognised video file is
//! resolved and renamed. Each file ends up with exactly one outcome and a
//! single file's failure never stops the batch.

mod report;
mod runner;

pub use report::{BatchReport, FileOutcome};
pub use runner::BatchRunner;
