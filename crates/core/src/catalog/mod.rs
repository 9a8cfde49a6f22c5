//! Offline TMDB catalog built from the daily movie ID export.
//!
//! The export is a gzip-compressed file with one JSON object per line. It is
//! downloaded into a per-run working directory, decoded incrementally and
//! indexed by lower-cased title and original title for exact lookups.

mod export;
mod index;
mod types;

pub use export::{default_export_url, ExportFetcher, EXPORT_BASE_URL};
pub use index::CatalogIndex;
pub use types::{CatalogEntry, LoadStats};

use thiserror::Error;

/// Errors that abort loading the catalog export.
///
/// A malformed line is never one of these; it is skipped and counted in
/// [`LoadStats::malformed_lines`].
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// The HTTP request could not be made or the body could not be read.
    #[error("Failed to fetch catalog export from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("Catalog export request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The gzip stream is corrupt or truncated.
    #[error("Failed to decompress catalog export: {0}")]
    Decompress(#[source] std::io::Error),

    /// The per-run working directory could not be created.
    #[error("Failed to create export working directory: {0}")]
    Workspace(#[source] std::io::Error),

    /// Local I/O failure while storing or reading the export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogLoadError {
    /// Short name of the stage that failed, for operator-facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Fetch { .. } | Self::HttpStatus { .. } => "fetch",
            Self::Decompress(_) => "decompress",
            Self::Workspace(_) | Self::Io(_) => "workspace",
        }
    }
}
