//! Sign-Harvest main entry point
//!
//! This is the command-line interface for the Sign-Harvest dictionary crawler.

use anyhow::Context;
use clap::Parser;
use sign_harvest::config::{load_config_with_hash, Config};
use sign_harvest::crawler::crawl;
use sign_harvest::localize::run_localize;
use sign_harvest::output::{load_merged, merge_backups, print_report, write_merged};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Sign-Harvest: a sign-language dictionary crawler
///
/// Sign-Harvest walks the categories of a sign-language dictionary site and
/// writes one JSON line per sign (gloss, grammatical category, video URL) into
/// a backup file per category. Backups can then be merged into a single
/// dataset and localized into the site's other languages.
#[derive(Parser, Debug)]
#[command(name = "sign-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A sign-language dictionary crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resume at this category (1-based, as printed when a run aborts)
    #[arg(long, value_name = "N", default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    start_from: u64,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["merge", "localize"])]
    dry_run: bool,

    /// Merge the per-category backups into the dataset file and exit
    #[arg(long, conflicts_with_all = ["dry_run", "localize"])]
    merge: bool,

    /// Localize the merged dataset into these locales (e.g. en.us pt.br) and exit
    #[arg(long, value_name = "LOCALE", num_args = 1.., conflicts_with_all = ["dry_run", "merge"])]
    localize: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, cli.start_from as usize)
    } else if cli.merge {
        handle_merge(&config)
    } else if !cli.localize.is_empty() {
        handle_localize(&config, &cli.localize).await
    } else {
        handle_crawl(&config, cli.start_from as usize).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sign_harvest=info,warn"),
            1 => EnvFilter::new("sign_harvest=debug,info"),
            2 => EnvFilter::new("sign_harvest=trace,debug"),
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
fn handle_dry_run(config: &Config, start_from: usize) -> anyhow::Result<()> {
    println!("=== Sign-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Root: {}", config.site.root_url);
    println!("  Category index: {}", config.site.categories_url()?);
    println!("  Locale: {}", config.site.locale);

    println!("\nCrawler Configuration:");
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);
    println!(
        "  Max concurrent requests (localize): {}",
        config.crawler.max_concurrent_requests
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.value);

    println!("\nOutput:");
    println!("  Backups: {}", config.output.backup_dir);
    println!("  Merged dataset: {}", config.output.merged_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at category #{}", start_from);

    Ok(())
}

/// Handles the --merge mode: joins every backup file into the dataset
fn handle_merge(config: &Config) -> anyhow::Result<()> {
    println!("=== Merging Backups ===\n");
    println!("Backups: {}", config.output.backup_dir);
    println!("Output: {}", config.output.merged_path);
    println!();

    let rows = merge_backups(Path::new(&config.output.backup_dir))?;
    write_merged(Path::new(&config.output.merged_path), &rows)?;

    println!("✓ {} records merged into: {}", rows.len(), config.output.merged_path);

    Ok(())
}

/// Handles the --localize mode: re-fetches every merged sign in each locale
async fn handle_localize(config: &Config, locales: &[String]) -> anyhow::Result<()> {
    let merged_path = Path::new(&config.output.merged_path);
    let records = load_merged(merged_path).with_context(|| {
        format!(
            "Failed to load {} (run with --merge first)",
            merged_path.display()
        )
    })?;

    tracing::info!("Loaded {} merged records", records.len());

    for (locale, outcome) in run_localize(config, &records, locales).await? {
        println!(
            "{}: {} localized, {} failed",
            locale,
            outcome.records.len(),
            outcome.failed
        );
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, start_from: usize) -> anyhow::Result<()> {
    if start_from > 1 {
        tracing::info!("Resuming crawl at category #{}", start_from);
    } else {
        tracing::info!("Starting crawl");
    }

    match crawl(config, start_from).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            if let Some(index) = e.category_index() {
                eprintln!("Resume with: --start-from {}", index);
            }
            Err(e.into())
        }
    }
}
