use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use netflox_core::{RunOptions, StrategyKind};

#[derive(Parser, Debug)]
#[command(name = "netflox-rename")]
#[command(author, version, about = "Rename movie files in the videos directory to <tmdb id>.<ext>")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Videos directory (overrides library.videos_dir)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// How titles are matched to catalog IDs (overrides renamer.strategy)
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Files processed at once with exact-index (overrides renamer.concurrency)
    #[arg(long, value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,

    /// Match and report, but do not rename anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging and print each failure reason
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Query the TMDB search API for each file
    FuzzySearch,
    /// Look titles up in the TMDB daily export
    ExactIndex,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::FuzzySearch => StrategyKind::FuzzySearch,
            StrategyArg::ExactIndex => StrategyKind::ExactIndex,
        }
    }
}

impl Cli {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            dry_run: self.dry_run,
            strategy: self.strategy.map(StrategyKind::from),
            videos_dir: self.dir.clone(),
            concurrency: self.concurrency,
        }
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug,hyper=info,reqwest=info"
        } else {
            "info"
        }
    }
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
