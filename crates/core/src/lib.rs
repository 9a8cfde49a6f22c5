pub mod batch;
pub mod catalog;
pub mod config;
pub mod library;
pub mod normalize;
pub mod pipeline;
pub mod renamer;
pub mod resolver;
pub mod search;
pub mod testing;

pub use batch::{BatchReport, BatchRunner, FileOutcome};
pub use catalog::{CatalogEntry, CatalogIndex, CatalogLoadError, ExportFetcher};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, SanitizedConfig, StrategyKind,
};
pub use library::{LibraryError, VideoInfo, VideoLibrary};
pub use normalize::normalize;
pub use pipeline::{PipelineError, RenamePipeline, RunOptions};
pub use renamer::{FailReason, RawFileEntry, RenameExecutor, RenameOutcome, SkipReason};
pub use resolver::{MatchResolver, MatchStrategy, Resolution};
pub use search::{MatchCandidate, MovieSearch, SearchError, TmdbSearchClient};
