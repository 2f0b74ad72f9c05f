//! Catalog-Relay main entry point
//!
//! This is the command-line interface for harvesting catalog articles and
//! relaying them as comments.

use anyhow::Context;
use catalog_relay::auth::authorize_url;
use catalog_relay::config::{load_config, validate, Config};
use catalog_relay::{run_pipeline, TracingSink};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Catalog-Relay: harvest catalog articles and post them as comments
///
/// Collects the article of every product in a catalog section (including
/// all pagination pages) and posts each one as a separate comment to a
/// wall post. Without an access token, opens the OAuth authorize page and
/// exits.
#[derive(Parser, Debug)]
#[command(name = "catalog-relay")]
#[command(version)]
#[command(about = "Harvest catalog articles and relay them as comments", long_about = None)]
struct Cli {
    /// API access token copied from the browser URL
    #[arg(short, long)]
    token: Option<String>,

    /// Post to comment on, as <owner>_<post> (vk.com/wall<POST>)
    #[arg(short, long)]
    post: Option<String>,

    /// Catalog section to harvest
    #[arg(short, long)]
    url: Option<String>,

    /// Number of concurrent connections per session
    #[arg(short, long)]
    connections: Option<usize>,

    /// Number of attempts per request
    #[arg(short, long)]
    retries: Option<u32>,

    /// Optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply(&self, config: &mut Config) {
        if let Some(token) = &self.token {
            config.api.access_token = Some(token.clone());
        }
        if let Some(post) = &self.post {
            config.api.post = post.clone();
        }
        if let Some(url) = &self.url {
            config.catalog.start_url = url.clone();
        }
        if let Some(connections) = self.connections {
            config.network.connections = connections;
        }
        if let Some(retries) = self.retries {
            config.network.retries = retries;
        }
    }
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
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };
    cli.apply(&mut config);
    validate(&config).context("invalid configuration")?;

    let Some(token) = config.api.access_token.clone() else {
        handle_authorize(&config);
        return Ok(());
    };

    tracing::info!(
        "Relaying articles from {} to post {}",
        config.catalog.start_url,
        config.api.post
    );
    let report = run_pipeline(&config, &token, Arc::new(TracingSink)).await?;

    tracing::info!(
        "Done: {} harvested, {} posted, {} failed",
        report.harvested,
        report.relay.posted,
        report.relay.failed
    );
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_relay=info,warn"),
            1 => EnvFilter::new("catalog_relay=debug,info"),
            2 => EnvFilter::new("catalog_relay=trace,debug"),
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

/// Sends the user to the OAuth authorize page instead of scraping
fn handle_authorize(config: &Config) {
    let url = authorize_url(&config.api);
    if let Err(e) = open::that(url.as_str()) {
        tracing::debug!("Could not open a browser: {}", e);
    }
    println!("{}", url);
    println!("Copy access_token from browser URL");
}
