//! Unsplash-Stream main entry point
//!
//! This is the command-line interface for collecting a small labeled photo
//! dataset from Unsplash topics.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use unsplash_stream::config::{apply_overrides, load_config_with_hash, Config};
use unsplash_stream::output::{print_statistics, DirectorySink, RecordSink};
use unsplash_stream::{SearchRequest, SearchSession, UnsplashClient};
use tracing_subscriber::EnvFilter;

/// Unsplash-Stream: a lazily polled photo dataset
///
/// Polls Unsplash topics page by page, keeps captioned, non-premium photos,
/// downloads them, and writes each image plus a manifest line to the output
/// directory until the record limit is reached.
#[derive(Parser, Debug)]
#[command(name = "unsplash-stream")]
#[command(version)]
#[command(about = "Collect captioned photos from Unsplash topics", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Search these topics instead of the configured ones (repeatable)
    #[arg(long = "topic", value_name = "TOPIC")]
    topics: Vec<String>,

    /// Override the number of records to collect
    #[arg(long)]
    limit: Option<usize>,

    /// Seed topic selection for a reproducible fetch order
    #[arg(long)]
    seed: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be collected without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = apply_overrides(&mut config, &cli.topics, cli.limit) {
        tracing::error!("Invalid command-line override: {}", e);
        return Err(e.into());
    }

    let mut request = SearchRequest::from_config(&config.search)?;
    if let Some(seed) = cli.seed {
        request = request.with_seed(seed);
    }

    if cli.dry_run {
        handle_dry_run(&config, &request);
        return Ok(());
    }

    handle_collect(&config, request, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("unsplash_stream=info,warn"),
            1 => EnvFilter::new("unsplash_stream=debug,info"),
            2 => EnvFilter::new("unsplash_stream=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config, request: &SearchRequest) {
    println!("=== Unsplash-Stream Dry Run ===\n");

    println!("Search:");
    println!("  Base URL: {}", config.search.base_url);
    println!("  Per page: {}", config.search.per_page);
    println!("  Limit: {}", request.limit());
    println!("  On exhausted topic: {:?}", request.exhaustion_policy());
    match config.search.max_consecutive_unavailable {
        Some(max) => println!("  Give up after: {} consecutive unavailable pages", max),
        None => println!("  Give up after: never"),
    }

    println!("\nTopics ({}):", request.topics().len());
    for topic in request.topics() {
        println!("  - {}", topic);
    }

    println!("\nClient:");
    println!("  User agent: {}", config.client.user_agent);
    println!("  Timeout: {}s", config.client.timeout_secs);
    println!("  Connect timeout: {}s", config.client.connect_timeout_secs);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Manifest: {}", config.output.manifest_file);

    println!("\n✓ Configuration is valid");
}

/// Handles the main collection run
async fn handle_collect(
    config: &Config,
    request: SearchRequest,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = Arc::new(UnsplashClient::new(&config.client, &config.search)?);
    let mut sink = DirectorySink::create(Path::new(&config.output.directory), &config.output.manifest_file)?;

    tracing::info!(
        "Collecting {} records from {} topic(s) into {}",
        request.limit(),
        request.topics().len(),
        config.output.directory
    );

    let mut session = SearchSession::with_client(request, client);

    while let Some(record) = session.next_record().await {
        match sink.write_record(&record) {
            Ok(entry) => tracing::debug!(file = %entry.file, "Stored record"),
            Err(e) => {
                tracing::error!("Failed to store record {}: {}", sink.next_index(), e);
                sink.finish()?;
                return Err(e.into());
            }
        }
    }

    sink.finish()?;

    if !quiet {
        print_statistics(session.stats());
    }

    tracing::info!(
        "Collection finished: {} records written to {}",
        sink.written(),
        sink.directory().display()
    );

    Ok(())
}
