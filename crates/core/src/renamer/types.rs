//! Types for the renamer module.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// A video file found in the library directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFileEntry {
    pub path: PathBuf,
    /// Extension with its leading dot, case preserved (`.MKV` stays `.MKV`).
    pub extension: String,
    /// File name without the extension. Lossy when the name is not UTF-8.
    pub raw_stem: String,
    /// False when the on-disk name had to be decoded lossily.
    pub utf8_name: bool,
}

impl RawFileEntry {
    /// Split a path into stem and extension. `None` when the path has no
    /// usable file name or no extension.
    ///
    /// Names that are not valid UTF-8 are still returned, decoded lossily and
    /// flagged through `utf8_name`, so the batch can report them.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let stem = path.file_stem()?;
        let ext = path.extension()?;

        Some(Self {
            utf8_name: stem.to_str().is_some() && ext.to_str().is_some(),
            raw_stem: stem.to_string_lossy().into_owned(),
            extension: format!(".{}", ext.to_string_lossy()),
            path,
        })
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.raw_stem, self.extension)
    }

    /// Path the file would have once named after `catalog_id`.
    pub fn target_path(&self, catalog_id: u64) -> PathBuf {
        let dir = self.path.parent().unwrap_or_else(|| Path::new(""));
        dir.join(format!("{}{}", catalog_id, self.extension))
    }
}

/// Why a file was deliberately left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// The name is already a bare catalog ID.
    AlreadyResolved,
    /// The name was nothing but release noise.
    EmptyTitle,
    /// The run was cancelled before this file was reached.
    Cancelled,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::AlreadyResolved => write!(f, "already-resolved"),
            SkipReason::EmptyTitle => write!(f, "empty-title"),
            SkipReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Why a file could not be renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailReason {
    NoMatch,
    /// Another file already has the target name.
    TargetExists,
    SearchUnavailable(String),
    Io(String),
}

impl std::fmt::Display for FailReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailReason::NoMatch => write!(f, "no-match"),
            FailReason::TargetExists => write!(f, "target-exists"),
            FailReason::SearchUnavailable(msg) => write!(f, "search-unavailable: {}", msg),
            FailReason::Io(msg) => write!(f, "io: {}", msg),
        }
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenameOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    /// A rename that would have happened outside dry-run mode.
    DryRun { from: PathBuf, to: PathBuf },
    Skipped { reason: SkipReason },
    Failed { reason: FailReason },
}

impl RenameOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    pub fn failed(reason: FailReason) -> Self {
        Self::Failed { reason }
    }

    /// Renamed, or would have been in dry-run mode.
    pub fn is_renamed(&self) -> bool {
        matches!(self, Self::Renamed { .. } | Self::DryRun { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// New path for renamed and dry-run outcomes.
    pub fn target(&self) -> Option<&Path> {
        match self {
            Self::Renamed { to, .. } | Self::DryRun { to, .. } => Some(to),
            _ => None,
        }
    }
}

impl std::fmt::Display for RenameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = |p: &Path| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        match self {
            Self::Renamed { from, to } => write!(f, "renamed {} -> {}", name(from), name(to)),
            Self::DryRun { from, to } => {
                write!(f, "would rename {} -> {}", name(from), name(to))
            }
            Self::Skipped { reason } => write!(f, "skipped ({})", reason),
            Self::Failed { reason } => write!(f, "failed ({})", reason),
        }
    }
}
