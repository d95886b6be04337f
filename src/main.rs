//! Archive Harvester main entry point
//!
//! This is the command-line interface for the two-phase archive harvester.

use anyhow::Context;
use archive_harvester::config::{load_config_with_hash, Config};
use archive_harvester::crawler::{harvest_articles, harvest_pages, PageCrawler};
use archive_harvester::output::{print_article_statistics, print_page_statistics};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Archive Harvester: collects an article archive in two phases
///
/// `pages` walks the paginated listing and writes the article index.
/// `articles` reads the index back and stores every article as a text file.
#[derive(Parser, Debug)]
#[command(name = "archive-harvester")]
#[command(version)]
#[command(about = "A two-phase article archive harvester", long_about = None)]
struct Cli {
    /// Phase to run
    #[arg(value_enum, value_name = "MODE")]
    mode: Mode,

    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the configuration and planned batches without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Crawl the listing pages and write the article index
    Pages,
    /// Download every article listed in the index
    Articles,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        return handle_dry_run(&config, cli.mode);
    }

    match cli.mode {
        Mode::Pages => {
            let stats = harvest_pages(&config).await.context("Page crawl failed")?;
            tracing::info!("Index written to {}", config.output.index_path);
            if !cli.quiet {
                print_page_statistics(&stats);
            }
        }
        Mode::Articles => {
            let stats = harvest_articles(&config)
                .await
                .context("Article crawl failed")?;
            tracing::info!("Articles stored in {}", config.output.articles_dir);
            if !cli.quiet {
                print_article_statistics(&stats);
            }
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("archive_harvester=info,warn"),
            1 => EnvFilter::new("archive_harvester=debug,info"),
            2 => EnvFilter::new("archive_harvester=trace,debug"),
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

/// Handles the --dry-run mode: shows what a run would do
fn handle_dry_run(config: &Config, mode: Mode) -> anyhow::Result<()> {
    println!("=== Archive Harvester Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Page batch size: {}", config.crawler.page_batch_size);
    println!("  Article batch size: {}", config.crawler.article_batch_size);
    println!(
        "  Politeness delay: {}ms",
        config.crawler.politeness_delay_ms
    );
    println!("  Skip prefix: {}", config.crawler.skip_prefix);
    println!("  Missing field policy: {:?}", config.crawler.missing_field);
    println!("  Skip existing: {}", config.crawler.skip_existing);

    println!("\nOutput:");
    println!("  Index: {}", config.output.index_path);
    println!("  Articles: {}", config.output.articles_dir);

    match mode {
        Mode::Pages => {
            let crawler = PageCrawler::new(config)?;
            let plan = crawler.plan();
            println!("\nPlanned batches ({}):", plan.len());
            if let (Some(first), Some(last)) = (plan.first(), plan.last()) {
                println!("  first: pages {}-{}", first.start(), first.end());
                println!("  last: pages {}-{}", last.start(), last.end());
                println!("  first URL: {}", crawler.page_url(*first.start()));
            }
        }
        Mode::Articles => {
            println!(
                "\nWould read the index and fetch its articles in windows of {}",
                config.crawler.article_batch_size
            );
        }
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}
