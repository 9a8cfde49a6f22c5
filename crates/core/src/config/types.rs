use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Lower bound on the spacing between two TMDB search calls.
pub const MIN_REQUEST_DELAY_MS: u64 = 200;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub renamer: RenamerConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// TMDB access configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB v3 API key. Only required for the fuzzy search strategy.
    #[serde(default)]
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Locale sent with every search.
    #[serde(default = "default_language")]
    pub language: String,
    /// Region sent with every search.
    #[serde(default = "default_region")]
    pub region: String,
    /// Bulk export URL. When unset, the dated daily export is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_url: Option<String>,
    /// Minimum delay between consecutive search calls.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            language: default_language(),
            region: default_region(),
            export_url: None,
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout(),
        }
    }
}

impl TmdbConfig {
    /// Request delay with the minimum spacing enforced.
    pub fn effective_request_delay_ms(&self) -> u64 {
        self.request_delay_ms.max(MIN_REQUEST_DELAY_MS)
    }
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_language() -> String {
    "fr-FR".to_string()
}

fn default_region() -> String {
    "FR".to_string()
}

fn default_request_delay_ms() -> u64 {
    250
}

fn default_timeout() -> u64 {
    30
}

/// Video directory configuration, shared by the renamer and the server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    #[serde(default = "default_videos_dir")]
    pub videos_dir: PathBuf,
    /// Recognised video extensions, with leading dot, compared case-insensitively.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Create the videos directory when it does not exist.
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            videos_dir: default_videos_dir(),
            extensions: default_extensions(),
            create_if_missing: true,
        }
    }
}

fn default_videos_dir() -> PathBuf {
    PathBuf::from("public/videos")
}

fn default_extensions() -> Vec<String> {
    [".mp4", ".mkv", ".avi", ".mov", ".wmv"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

/// Matching strategy used for a rename run.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Free-text search against the TMDB search endpoint.
    #[default]
    FuzzySearch,
    /// Exact title lookup in the TMDB daily export.
    ExactIndex,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::FuzzySearch => write!(f, "fuzzy_search"),
            StrategyKind::ExactIndex => write!(f, "exact_index"),
        }
    }
}

/// Batch renamer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenamerConfig {
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Parallel renames for the exact index strategy.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Parent of the per-run export working directory (default: OS temp dir).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
}

impl Default for RenamerConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            concurrency: default_concurrency(),
            temp_dir: None,
        }
    }
}

fn default_concurrency() -> usize {
    4
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Built front-end to serve, with `index.html` as SPA fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
    /// Allowed CORS origins. Empty means permissive.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            cors_origins: Vec::new(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    3000
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub tmdb: SanitizedTmdbConfig,
    pub library: LibraryConfig,
    pub renamer: RenamerConfig,
    pub server: ServerConfig,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub api_key_configured: bool,
    pub base_url: String,
    pub language: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_url: Option<String>,
    pub request_delay_ms: u64,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            tmdb: SanitizedTmdbConfig {
                api_key_configured: !config.tmdb.api_key.is_empty(),
                base_url: config.tmdb.base_url.clone(),
                language: config.tmdb.language.clone(),
                region: config.tmdb.region.clone(),
                export_url: config.tmdb.export_url.clone(),
                request_delay_ms: config.tmdb.effective_request_delay_ms(),
                timeout_secs: config.tmdb.timeout_secs,
            },
            library: config.library.clone(),
            renamer: config.renamer.clone(),
            server: config.server.clone(),
        }
    }
}
