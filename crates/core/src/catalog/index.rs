//! In-memory title index over the export.

use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use tracing::{debug, trace};

use super::types::{CatalogEntry, ExportLine, LoadStats};
use super::CatalogLoadError;
use crate::normalize::normalize;

/// Exact-match index from lower-cased title to catalog entry.
///
/// Every parsed entry is stored once. Usable entries are keyed under both
/// their title and original title, each as written and in normalized form,
/// so a file stem that went through [`normalize`] finds `Spider-Man` under
/// `spider man`. When two entries share a key, the one seen first in the
/// export keeps it.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    entries: Vec<CatalogEntry>,
    keys: HashMap<String, usize>,
    stats: LoadStats,
}

impl CatalogIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from entries already in memory.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.stats.lines += 1;
            index.stats.entries += 1;
            index.insert(entry);
        }
        index
    }

    /// Builds an index from uncompressed newline-delimited JSON.
    pub fn from_json_lines<R: BufRead>(reader: R) -> Result<Self, CatalogLoadError> {
        Self::read_lines(reader).map_err(CatalogLoadError::Io)
    }

    /// Builds an index from a gzip-compressed export, decoding as it reads.
    pub fn from_gzip_reader<R: Read>(reader: R) -> Result<Self, CatalogLoadError> {
        let decoder = BufReader::new(GzDecoder::new(reader));
        Self::read_lines(decoder).map_err(CatalogLoadError::Decompress)
    }

    fn read_lines<R: BufRead>(mut reader: R) -> Result<Self, std::io::Error> {
        let mut index = Self::new();
        let mut buf = Vec::with_capacity(256);
        let mut line_no = 0u64;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim(),
                Err(_) => {
                    index.stats.lines += 1;
                    index.stats.malformed_lines += 1;
                    trace!("Export line {} is not valid UTF-8", line_no);
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }
            index.stats.lines += 1;

            match serde_json::from_str::<ExportLine>(line) {
                Ok(raw) => {
                    index.stats.entries += 1;
                    index.insert(raw.into());
                }
                Err(e) => {
                    index.stats.malformed_lines += 1;
                    trace!("Skipping malformed export line {}: {}", line_no, e);
                }
            }
        }

        debug!(
            "Catalog index built: {} entries, {} keys, {} malformed lines",
            index.entries.len(),
            index.keys.len(),
            index.stats.malformed_lines
        );
        Ok(index)
    }

    fn insert(&mut self, entry: CatalogEntry) {
        let idx = self.entries.len();
        if entry.is_usable() {
            for title in [&entry.title, &entry.original_title] {
                for key in [title.trim().to_lowercase(), normalize(title).to_lowercase()] {
                    if !key.is_empty() {
                        self.keys.entry(key).or_insert(idx);
                    }
                }
            }
        } else {
            self.stats.untitled_entries += 1;
        }
        self.entries.push(entry);
    }

    /// Exact lookup. The caller is expected to pass an already lower-cased,
    /// normalized title.
    pub fn lookup(&self, key: &str) -> Option<&CatalogEntry> {
        self.keys.get(key).map(|&idx| &self.entries[idx])
    }

    /// Number of entries stored (usable or not).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct lookup keys.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// All stored entries in export order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}
