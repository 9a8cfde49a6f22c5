mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use netflox_core::{
    load_config_or_default, validate_config, BatchReport, PipelineError, RenamePipeline,
};

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so the report on stdout stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli).await {
        Ok(report) => print_report(&report, cli.verbose),
        Err(e) => {
            let stage = e
                .downcast_ref::<PipelineError>()
                .map(PipelineError::stage)
                .unwrap_or("startup");
            error!("Fatal error during {}: {:#}", stage, e);
            eprintln!("netflox-rename: {} failed: {:#}", stage, e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli) -> Result<BatchReport> {
    info!("Loading configuration from {:?}", cli.config);
    let config = load_config_or_default(&cli.config)
        .map_err(PipelineError::from)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    validate_config(&config).map_err(PipelineError::from)?;

    let options = cli.run_options();
    if options.dry_run {
        info!("Dry run: no file will be renamed");
    }

    let pipeline = RenamePipeline::from_config(&config, options).await?;
    info!("Renaming videos in {}", pipeline.videos_dir().display());

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the current file");
            on_interrupt.cancel();
        }
    });

    Ok(pipeline.run(&cancel).await?)
}

fn print_report(report: &BatchReport, verbose: bool) {
    let mode = if report.dry_run { " (dry run)" } else { "" };
    println!(
        "{}{}: {} renamed, {} skipped, {} failed, {} total",
        report.strategy,
        mode,
        report.renamed_count,
        report.skipped_count,
        report.error_count,
        report.total_count
    );

    if verbose {
        for failure in report.failures() {
            println!("  {}: {}", failure.file_name, failure.outcome);
        }
    }

    println!("Files in directory:");
    for name in &report.final_listing {
        println!("  {}", name);
    }
}
