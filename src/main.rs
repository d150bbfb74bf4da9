//! Anteater main entry point
//!
//! This is the command-line interface for the Anteater campus crawler.

use anteater::config::{load_config_with_hash, Config};
use anteater::crawler::Coordinator;
use anteater::output::{print_report, report_from_file, write_markdown_report, CrawlReport};
use anteater::url::{TrapClassifier, Verdict};
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Anteater: a polite crawler for the UCI school websites
///
/// Anteater crawls a fixed set of university subdomains, skips crawler
/// traps, and keeps running statistics over every page it reads: unique
/// pages, word frequencies, subdomain counts and the longest page.
#[derive(Parser, Debug)]
#[command(name = "anteater")]
#[command(version)]
#[command(about = "A polite campus web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export_report", "check_url"])]
    dry_run: bool,

    /// Print a report from the last analytics snapshot and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_report", "check_url"])]
    stats: bool,

    /// Write a markdown report from the last analytics snapshot and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "check_url"])]
    export_report: bool,

    /// Show whether each URL would be crawled, and which rule rejects it
    #[arg(long, value_name = "URL", num_args = 1..)]
    check_url: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given; using built-in defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else if cli.export_report {
        handle_export_report(&config)
    } else if !cli.check_url.is_empty() {
        handle_check_urls(&config, &cli.check_url)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("anteater=info,warn"),
            1 => EnvFilter::new("anteater=debug,info"),
            2 => EnvFilter::new("anteater=trace,debug"),
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
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let classifier = TrapClassifier::from_config(config)?;

    println!("=== Anteater Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    if config.crawler.max_pages > 0 {
        println!("  Page cap: {}", config.crawler.max_pages);
    } else {
        println!("  Page cap: none");
    }

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);

    println!("\nAllowed Domains ({}):", config.scope.allowed_domains.len());
    for domain in &config.scope.allowed_domains {
        println!("  - {}", domain);
    }
    println!("  Subdomains counted under: {}", config.scope.analytics_domain);

    println!("\nTrap Rules ({}):", classifier.rules().len());
    for rule in classifier.rules() {
        println!("  - {}", rule.name());
    }

    println!("\nLimits:");
    println!("  Max content length: {} bytes", config.limits.max_content_length);
    println!("  Min text length: {} chars", config.limits.min_text_length);
    println!("  Snapshot every {} pages", config.limits.snapshot_interval);

    println!("\nOutput:");
    println!("  Snapshot: {}", config.output.snapshot_path);
    println!("  Report: {}", config.output.report_path);

    println!("\nSeeds ({}):", config.crawler.seeds.len());
    let mut admitted = 0;
    for seed in &config.crawler.seeds {
        let verdict = classifier.verdict(seed);
        if verdict.is_crawlable() {
            admitted += 1;
        }
        println!("  {} {}", verdict_label(&verdict), seed);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} seed URLs", admitted);

    Ok(())
}

/// Handles the --stats mode: prints a report from the last snapshot
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = Path::new(&config.output.snapshot_path);
    println!("Snapshot: {}\n", path.display());

    let report = report_from_file(path, config.output.top_words)?;
    print_report(&report);

    Ok(())
}

/// Handles the --export-report mode: writes the markdown report
fn handle_export_report(config: &Config) -> anyhow::Result<()> {
    println!("=== Exporting Crawl Report ===\n");
    println!("Snapshot: {}", config.output.snapshot_path);
    println!("Output: {}", config.output.report_path);
    println!();

    let report = report_from_file(Path::new(&config.output.snapshot_path), config.output.top_words)?;
    write_markdown_report(&report, Path::new(&config.output.report_path))?;

    println!("✓ Report exported to: {}", config.output.report_path);

    Ok(())
}

/// Handles the --check-url mode: prints the verdict for each URL
fn handle_check_urls(config: &Config, urls: &[String]) -> anyhow::Result<()> {
    let classifier = TrapClassifier::from_config(config)?;

    for url in urls {
        println!("{} {}", verdict_label(&classifier.verdict(url)), url);
    }

    Ok(())
}

fn verdict_label(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Crawl => "[crawl]".to_string(),
        Verdict::Reject(rule) => format!("[reject: {}]", rule),
        Verdict::Malformed => "[malformed]".to_string(),
    }
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Seeds: {}, allowed domains: {}, workers: {}",
        config.crawler.seeds.len(),
        config.scope.allowed_domains.len(),
        config.crawler.workers
    );

    let top_words = config.output.top_words;
    let report_path = PathBuf::from(&config.output.report_path);

    let mut coordinator = Coordinator::new(config)
        .await
        .context("failed to start the crawler")?;
    let outcome = coordinator.run().await.context("crawl failed")?;

    if outcome.interrupted {
        tracing::warn!("Crawl interrupted after {} pages", outcome.pages_fetched);
    } else {
        tracing::info!("Crawl completed successfully");
    }

    let report = CrawlReport::from_snapshot(&coordinator.analytics().snapshot(), top_words);
    match write_markdown_report(&report, &report_path) {
        Ok(()) => tracing::info!("Report written to {}", report_path.display()),
        Err(e) => tracing::error!("Failed to write report: {}", e),
    }

    Ok(())
}
