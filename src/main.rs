//! Refcheck main entry point
//!
//! This is the command-line interface for the refcheck link checker.

use anyhow::Context;
use clap::Parser;
use refcheck::checker::check_links;
use refcheck::config::load_config_with_hash;
use refcheck::input::load_links;
use refcheck::output::write_reports;
use refcheck::CheckStatus;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Refcheck: a concurrent document link checker
///
/// Refcheck verifies hyperlink references extracted from a document
/// corpus: reachability, in-page anchors, redirects, per-target
/// authentication and headers, and ignore rules. It writes a plain-text
/// problem report and a JSON-lines record of every checked link.
#[derive(Parser, Debug)]
#[command(name = "refcheck")]
#[command(version)]
#[command(about = "A concurrent document link checker", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Path to the links file (one JSON record per line:
    /// filename, lineno, uri)
    #[arg(value_name = "LINKS")]
    links: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be checked without any network I/O
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Load link references from the upstream extractor
    let links = load_links(&cli.links)
        .with_context(|| format!("failed to load {}", cli.links.display()))?;
    tracing::info!("Loaded {} link references", links.len());

    if cli.dry_run {
        handle_dry_run(&config, links.len());
        return Ok(());
    }

    // Run the check
    let results = check_links(&config, links).await?;

    // Write both report encodings
    write_reports(&results, &config.output)?;
    tracing::info!(
        "Reports written to {} and {}",
        config.output.text_path,
        config.output.json_path
    );

    // Surface a non-clean result set to the invoking build process
    let failures = results
        .iter()
        .filter(|r| r.status.is_failure())
        .count();
    let ignored = results
        .iter()
        .filter(|r| r.status == CheckStatus::Ignored)
        .count();
    tracing::info!(
        "Checked {} links: {} problems, {} ignored",
        results.len(),
        failures,
        ignored
    );

    if failures > 0 {
        tracing::warn!("{} links are broken or timed out", failures);
        std::process::exit(1);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("refcheck=info,warn"),
            1 => EnvFilter::new("refcheck=debug,info"),
            2 => EnvFilter::new("refcheck=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the check plan
fn handle_dry_run(config: &refcheck::Config, link_count: usize) {
    println!("=== Refcheck Dry Run ===\n");

    println!("Checker Configuration:");
    println!("  Workers: {}", config.checker.workers);
    println!("  Timeout: {}s", config.checker.timeout);
    println!("  Retries: {}", config.checker.retries);
    println!("  Max redirects: {}", config.checker.max_redirects);
    println!("  Check anchors: {}", config.checker.check_anchors);
    println!("  User agent: {}", config.checker.user_agent);

    println!("\nOutput:");
    println!("  Text report: {}", config.output.text_path);
    println!("  JSON report: {}", config.output.json_path);

    println!("\nIgnore patterns ({}):", config.ignore.len());
    for pattern in &config.ignore {
        println!("  - {}", pattern);
    }

    println!("\nAnchor-ignore patterns ({}):", config.anchor_ignore.len());
    for pattern in &config.anchor_ignore {
        println!("  - {}", pattern);
    }

    println!("\nAuth rules ({}):", config.auth.len());
    for entry in &config.auth {
        println!("  - {} (user: {})", entry.pattern, entry.username);
    }

    println!("\nHeader rules ({}):", config.headers.len());
    for key in config.headers.keys() {
        println!("  - {}", key);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would check {} link references", link_count);
}
