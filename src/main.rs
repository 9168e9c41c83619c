//! Doc-Harvest main entry point
//!
//! This is the command-line interface for the Doc-Harvest documentation crawler.

use anyhow::Context;
use clap::Parser;
use doc_harvest::config::{load_config, Config};
use doc_harvest::output::{print_statistics, JsonWriter, ResultWriter};
use doc_harvest::url::parse_seed;
use doc_harvest::Crawler;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Doc-Harvest: a documentation site crawler
///
/// Doc-Harvest crawls a documentation site from a seed URL, extracts the
/// content and navigation of every page using generator-aware site profiles,
/// and writes the pages with retrieval-ready chunks as JSON.
#[derive(Parser, Debug)]
#[command(name = "doc-harvest")]
#[command(version)]
#[command(about = "A documentation site crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "SEED")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the page results and statistics as JSON to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Override the configured maximum link depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }

    if cli.dry_run {
        return handle_dry_run(&cli.seed, &config, cli.output.as_deref());
    }

    handle_crawl(&cli.seed, &config, cli.output.as_deref()).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_harvest=info,warn"),
            1 => EnvFilter::new("doc_harvest=debug,info"),
            2 => EnvFilter::new("doc_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(seed: &str, config: &Config, output: Option<&Path>) -> anyhow::Result<()> {
    let seed = parse_seed(seed).context("invalid seed URL")?;
    let crawler = Crawler::from_config(config)?;
    let crawler_config = crawler.config();

    println!("=== Doc-Harvest Dry Run ===\n");

    println!("Seed: {}", seed);
    match output {
        Some(path) => println!("Output: {}\n", path.display()),
        None => println!("Output: statistics only\n"),
    }

    println!("Crawler Configuration:");
    println!("  Max depth: {}", crawler_config.max_depth);
    println!("  Concurrency: {}", crawler_config.concurrency);
    println!("  Delay: {}ms", crawler_config.delay_ms);
    println!("  Timeout: {}s", crawler_config.timeout_secs);
    println!(
        "  Retries: {} ({:?} backoff)",
        crawler_config.retries, crawler_config.backoff
    );
    println!("  Rate limit: {}/s", crawler_config.rate_limit);
    println!("  User agent: {}", crawler_config.user_agent);
    println!("  Follow links: {}", crawler_config.follow_links);
    println!("  Include patterns: {:?}", crawler_config.include_patterns);
    println!("  Exclude patterns: {:?}", crawler_config.exclude_patterns);

    println!("\nRAG:");
    println!("  Enabled: {}", config.rag.enabled);
    println!("  Chunk size: {}", config.rag.chunk_size);

    println!("\nProfiles ({}):", crawler.registry().len());
    for profile in crawler.registry().profiles() {
        println!("  - {}: {}", profile.name(), profile.description());
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(seed: &str, config: &Config, output: Option<&Path>) -> anyhow::Result<()> {
    let crawler = Crawler::from_config(config)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing with the pages crawled so far");
            on_interrupt.cancel();
        }
    });

    let result = crawler.crawl_with_cancellation(seed, cancel).await?;

    if let Some(path) = output {
        JsonWriter::new(path)
            .write_result(&result)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    print_statistics(&result);
    Ok(())
}
