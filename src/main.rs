//! Sitescrape main entry point
//!
//! This is the command-line interface for the Sitescrape content harvester.

use clap::Parser;
use sitescrape::config::{load_config_with_hash, validate, Config, UNLIMITED_PAGES};
use sitescrape::crawler::{scrape_single, CrawlSession};
use sitescrape::output::{pages_to_json, print_statistics, CrawlEvent};
use sitescrape::{parse_seed_url, HarvestError};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

/// Sitescrape: a same-site content harvester
///
/// Sitescrape crawls a website breadth-first from a seed URL, stays on the
/// seed's host, and prints one JSON content record (title plus cleaned body
/// text) per fetched page.
#[derive(Parser, Debug)]
#[command(name = "sitescrape")]
#[command(version)]
#[command(about = "A same-site content harvester", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to scrape
    #[arg(short = 'n', long, conflicts_with_all = ["all", "single"])]
    max_pages: Option<usize>,

    /// Crawl the whole site (no page budget)
    #[arg(long, conflicts_with = "single")]
    all: bool,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Scrape only the given page, without following links
    #[arg(long, conflicts_with = "stream")]
    single: bool,

    /// Emit server-sent-event frames as pages are scraped
    #[arg(long)]
    stream: bool,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate the URL and configuration without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_effective_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Reject bad seeds before any network activity
    if let Err(e) = parse_seed_url(&cli.url) {
        tracing::error!("Invalid URL {}: {}", cli.url, e);
        return Err(HarvestError::from(e).into());
    }

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&cli, &config)?;
    } else if cli.single {
        handle_single(&cli, &config).await?;
    } else if cli.stream {
        handle_stream(&cli, &config).await?;
    } else {
        handle_crawl(&cli, &config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries the scraped records.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitescrape=info,warn"),
            1 => EnvFilter::new("sitescrape=debug,info"),
            2 => EnvFilter::new("sitescrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies CLI overrides, and validates the result
fn load_effective_config(cli: &Cli) -> Result<Config, HarvestError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if cli.all {
        config.crawler.max_pages = UNLIMITED_PAGES;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout = timeout;
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: validates inputs and shows what would be crawled
fn handle_dry_run(cli: &Cli, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let seed = parse_seed_url(&cli.url)?;

    println!("=== Sitescrape Dry Run ===\n");

    println!("Seed: {}", seed);
    if cli.single {
        println!("Mode: single page");
    } else if cli.stream {
        println!("Mode: streaming crawl");
    } else {
        println!("Mode: batch crawl");
    }

    println!("\nCrawler Configuration:");
    if config.crawler.is_unlimited() {
        println!("  Max pages: unlimited");
    } else {
        println!("  Max pages: {}", config.crawler.max_pages);
    }
    println!("  Timeout: {}s", config.crawler.timeout);
    println!("  Pacing delay: {}ms", config.crawler.pacing_delay);
    println!("  Progress interval: {}", config.crawler.progress_interval);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!(
        "\nExtra Boilerplate Phrases ({}):",
        config.extraction.boilerplate.len()
    );
    for phrase in &config.extraction.boilerplate {
        println!("  - {}", phrase);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --single mode: scrapes one page without following links
async fn handle_single(cli: &Cli, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = scrape_single(&cli.url, config).await?;
    if let Some(reason) = outcome.reason() {
        tracing::warn!("Page could not be extracted: {}", reason);
    }

    let json = pages_to_json(&[outcome.into_record()])?;
    write_output(cli.output.as_deref(), &json).await?;

    Ok(())
}

/// Handles the --stream mode: writes one SSE frame per crawl event
async fn handle_stream(cli: &Cli, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let session = CrawlSession::new(&cli.url, config)?;
    let mut events = session.stream();

    let mut sink: Box<dyn tokio::io::AsyncWrite + Unpin> = match &cli.output {
        Some(path) => Box::new(tokio::fs::File::create(path).await?),
        None => Box::new(tokio::io::stdout()),
    };

    let mut pages = 0usize;
    let mut failure = None;
    while let Some(event) = events.next().await {
        match &event {
            CrawlEvent::Page { .. } => pages += 1,
            CrawlEvent::Error { message, .. } => failure = Some(message.clone()),
            _ => {}
        }

        sink.write_all(event.to_sse_frame()?.as_bytes()).await?;
        sink.flush().await?;
    }

    if let Some(message) = failure {
        tracing::error!("Streaming crawl failed: {}", message);
    }

    if pages == 0 {
        return Err(HarvestError::NoContent {
            url: cli.url.clone(),
        }
        .into());
    }

    Ok(())
}

/// Handles the main batch crawl operation
async fn handle_crawl(cli: &Cli, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if config.crawler.is_unlimited() {
        tracing::info!("Crawling entire site (no page budget)");
    } else {
        tracing::info!("Crawling up to {} pages", config.crawler.max_pages);
    }

    let session = CrawlSession::new(&cli.url, config)?;
    let report = session.run().await.ensure_not_empty()?;

    tracing::info!(
        "Crawl finished ({:?}) with {} pages in {:.1}s",
        report.state,
        report.len(),
        report.elapsed.as_secs_f64()
    );

    write_output(cli.output.as_deref(), &report.to_json()?).await?;

    if !cli.quiet {
        print_statistics(&report.stats);
    }

    Ok(())
}

/// Writes rendered output to the given file, or stdout when none
async fn write_output(path: Option<&Path>, contents: &str) -> Result<(), HarvestError> {
    match path {
        Some(path) => {
            tokio::fs::write(path, contents).await?;
            tracing::info!("Output written to: {}", path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(contents.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
