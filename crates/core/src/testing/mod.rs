//! Testing utilities and mock implementations.
//!
//! Lets the resolver, the batch runner and the pipeline be exercised without
//! network access: `MockMovieSearch` stands in for TMDB search, and the
//! fixtures build catalog entries, gzip exports and video directories.
//!
//! # Example
//!
//! ```rust,ignore
//! use netflox_core::testing::{fixtures, MockMovieSearch};
//!
//! let search = MockMovieSearch::new();
//! search.set_results("Fight Club", vec![fixtures::candidate(550, "Fight Club")]).await;
//!
//! let dir = tempfile::TempDir::new()?;
//! fixtures::video_dir(dir.path(), &["Fight.Club.1999.1080p.mkv"]);
//! ```

mod mock_search;

pub use mock_search::{MockMovieSearch, RecordedSearch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use serde_json::{json, Value};
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use crate::catalog::CatalogEntry;
    use crate::search::MatchCandidate;

    /// Create a catalog entry with reasonable defaults.
    pub fn catalog_entry(id: u64, title: &str, original_title: &str) -> CatalogEntry {
        CatalogEntry {
            id,
            title: title.to_string(),
            original_title: original_title.to_string(),
            adult: false,
            popularity: 1.0,
        }
    }

    /// Create a search candidate at rank 0.
    pub fn candidate(id: u64, title: &str) -> MatchCandidate {
        MatchCandidate::new(id, title)
    }

    /// One export line in the shape of the TMDB daily ID export.
    pub fn export_line(id: u64, original_title: &str) -> String {
        json!({
            "adult": false,
            "id": id,
            "original_title": original_title,
            "popularity": 12.5,
            "video": false,
        })
        .to_string()
    }

    /// Gzip the given lines, newline-terminated, like the published export.
    pub fn gzip_export(lines: &[String]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        for line in lines {
            encoder
                .write_all(line.as_bytes())
                .and_then(|_| encoder.write_all(b"\n"))
                .expect("writing to a Vec cannot fail");
        }
        encoder.finish().expect("writing to a Vec cannot fail")
    }

    /// A TMDB `/search/movie` response body. Tuples are `(id, title, release_date)`.
    pub fn tmdb_search_body(results: &[(u64, &str, &str)]) -> Value {
        let results: Vec<Value> = results
            .iter()
            .map(|(id, title, release_date)| {
                json!({
                    "id": id,
                    "title": title,
                    "original_title": title,
                    "release_date": release_date,
                    "adult": false,
                    "popularity": 10.0,
                })
            })
            .collect();

        json!({
            "page": 1,
            "total_pages": 1,
            "total_results": results.len(),
            "results": results,
        })
    }

    /// Create one file per name in `dir`. Each file contains its own name,
    /// so tests can check which content ended up where.
    pub fn video_dir(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, name.as_bytes()).expect("fixture file is writable");
                path
            })
            .collect()
    }

    /// Sorted file names currently in `dir`.
    pub fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("fixture dir is readable")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
