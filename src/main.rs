//! Sumi-Scrape main entry point
//!
//! This is the command-line interface for the Sumi-Scrape page surveyor.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use sumi_scrape::config::{load_config, Config, ConfigOverrides};
use sumi_scrape::output::{print_summary, ReportFormat};
use sumi_scrape::{Coordinator, HeaderPool};
use tracing_subscriber::EnvFilter;

/// Exit code after an interrupted batch (128 + SIGINT)
const EXIT_INTERRUPTED: u8 = 130;

/// Sumi-Scrape: a concurrent page surveyor
///
/// Sumi-Scrape fetches a batch of pages concurrently with rotating request
/// headers, keeps every raw page, and writes a per-page report listing its
/// links, images and tag counts.
#[derive(Parser, Debug)]
#[command(name = "sumi-scrape")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent page surveyor", long_about = None)]
struct Cli {
    /// URLs to scrape
    #[arg(short, long = "urls", value_name = "URL", num_args = 1..)]
    urls: Vec<String>,

    /// File with one header mapping per line [default: user_agents.txt]
    #[arg(short = 'H', long = "headers-file", value_name = "FILE")]
    headers_file: Option<PathBuf>,

    /// Maximum number of concurrent requests [default: 10]
    #[arg(short = 'c', long = "concurrent-requests", value_name = "N")]
    concurrent_requests: Option<u32>,

    /// Directory for raw pages and reports [default: scraped_pages]
    #[arg(short, long = "output-dir", value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Report format: html, csv or pdf [default: csv]
    #[arg(short = 'f', long = "report-format", value_name = "FORMAT")]
    report_format: Option<String>,

    /// Request timeout in seconds [default: 10]
    #[arg(short, long = "timeout", value_name = "SECS")]
    timeout: Option<u64>,

    /// Optional TOML settings file; command-line flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate settings and header file, show the plan, and exit without fetching
    #[arg(long)]
    dry_run: bool,

    /// Do not print the startup banner
    #[arg(long)]
    no_banner: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            urls: self.urls.clone(),
            headers_file: self.headers_file.clone(),
            concurrent_requests: self.concurrent_requests,
            output_dir: self.output_dir.clone(),
            report_format: self.report_format.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if !cli.no_banner && !cli.quiet {
        print_banner();
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_INTERRUPTED),
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs the CLI; returns `Ok(false)` when the batch was interrupted
async fn run(cli: Cli) -> anyhow::Result<bool> {
    // Load and validate configuration
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = load_config(cli.config.as_deref(), cli.overrides())
        .context("Failed to load configuration")?;

    let pool = HeaderPool::load(&config.headers_file).with_context(|| {
        format!(
            "Failed to load headers from {}",
            config.headers_file.display()
        )
    })?;

    if cli.dry_run {
        handle_dry_run(&config, &pool);
        return Ok(true);
    }

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create output directory {}",
                config.output_dir.display()
            )
        })?;

    let coordinator = Coordinator::new(&config, pool)?;

    // Cancel the batch on Ctrl-C
    let cancel = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling outstanding requests");
            cancel.cancel();
        }
    });

    let summary = coordinator
        .run(&config.urls, &config.report_format)
        .await?;

    if !cli.quiet {
        print_summary(&summary);
    }

    Ok(!coordinator.is_cancelled())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scrape=info,warn"),
            1 => EnvFilter::new("sumi_scrape=debug,info"),
            2 => EnvFilter::new("sumi_scrape=trace,debug"),
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

fn print_banner() {
    println!("Sumi-Scrape {}", env!("CARGO_PKG_VERSION"));
    println!("Concurrent page surveyor\n");
}

/// Handles the --dry-run mode: shows what would be scraped
fn handle_dry_run(config: &Config, pool: &HeaderPool) {
    println!("=== Sumi-Scrape Dry Run ===\n");

    println!("Settings:");
    println!("  Concurrent requests: {}", config.concurrent_requests);
    println!("  Timeout: {}s", config.timeout.as_secs());
    println!("  Output directory: {}", config.output_dir.display());

    match config.report_format.parse::<ReportFormat>() {
        Ok(format) => println!("  Report format: {}", format),
        Err(_) => println!(
            "  Report format: {} (not recognised, pages will be saved without reports)",
            config.report_format
        ),
    }

    println!("\nHeaders:");
    println!("  File: {}", config.headers_file.display());
    println!("  Header sets: {}", pool.len());
    if let Some(hash) = pool.source_hash() {
        println!("  SHA-256: {}", hash);
    }

    println!("\nURLs ({}):", config.urls.len());
    for url in &config.urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would scrape {} URLs", config.urls.len());
}
