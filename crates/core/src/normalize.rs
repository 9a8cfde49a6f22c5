//! Filename normalization.
//!
//! Turns a release-style file stem such as `Fight.Club.1999.1080p.BluRay.x264`
//! into a search-friendly title (`Fight Club`). Pure string processing, no I/O.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Release metadata tokens removed from titles, matched as whole words and
/// case-insensitively.
pub const NOISE_TOKENS: &[&str] = &[
    // Resolution
    "720p",
    "1080p",
    "4k",
    // Encoding / source
    "bluray",
    "dvdrip",
    "webrip",
    "hdtv",
    "x264",
    "x265",
    "hevc",
    // Language / release
    "french",
    "vf",
    "vostfr",
    "multi",
    "truefrench",
];

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[._\-\[\](){}]").expect("separator pattern is valid"));

static NOISE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?i)\b(?:{})\b", NOISE_TOKENS.join("|"));
    Regex::new(&pattern).expect("noise pattern is valid")
});

// A standalone 4-digit number is treated as a release year.
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").expect("year pattern is valid"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Normalize a raw file stem into a title suitable for lookup or search.
///
/// Separators (`.`, `-`, `_` and brackets) become spaces, noise tokens and
/// years are dropped, and whitespace is collapsed and trimmed. The result may
/// be empty when the stem was nothing but noise.
pub fn normalize(raw_stem: &str) -> String {
    let spaced = SEPARATORS.replace_all(raw_stem, " ");
    let spaced = WHITESPACE.replace_all(&spaced, " ");
    let without_noise = NOISE.replace_all(&spaced, "");
    let without_years = YEAR.replace_all(&without_noise, "");
    WHITESPACE
        .replace_all(&without_years, " ")
        .trim()
        .to_string()
}

/// Whether a stem is already a bare catalog ID (`^[0-9]+$`).
pub fn is_catalog_id(stem: &str) -> bool {
    !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit())
}
