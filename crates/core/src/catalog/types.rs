//! Types for the catalog module.

use serde::{Deserialize, Serialize};

/// One movie record from the TMDB export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title. Absent from the raw ID export, so often empty.
    pub title: String,
    /// Title in the original language.
    pub original_title: String,
    pub adult: bool,
    pub popularity: f64,
}

impl CatalogEntry {
    /// Entries without any title can never be matched.
    pub fn is_usable(&self) -> bool {
        !self.title.trim().is_empty() || !self.original_title.trim().is_empty()
    }
}

/// Counters gathered while building the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Non-blank lines read.
    pub lines: u64,
    /// Entries parsed successfully.
    pub entries: u64,
    /// Lines that were not a valid export record.
    pub malformed_lines: u64,
    /// Entries kept but not keyed because both titles were empty.
    pub untitled_entries: u64,
}

/// Raw export line. Every field except the ID may be missing or null.
#[derive(Debug, Deserialize)]
pub(super) struct ExportLine {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    original_title: Option<String>,
    #[serde(default)]
    adult: Option<bool>,
    #[serde(default)]
    popularity: Option<f64>,
}

impl From<ExportLine> for CatalogEntry {
    fn from(line: ExportLine) -> Self {
        Self {
            id: line.id,
            title: line.title.unwrap_or_default(),
            original_title: line.original_title.unwrap_or_default(),
            adult: line.adult.unwrap_or(false),
            popularity: line.popularity.unwrap_or(0.0),
        }
    }
}
