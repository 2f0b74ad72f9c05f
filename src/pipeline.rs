//! End-to-end pipeline
//!
//! Two phases, each with its own session and retrying client:
//!
//! 1. **Harvest**: catalog session with the challenge resolver installed,
//!    traversing the start URL and its pagination pages
//! 2. **Publish**: API session with the error classifier installed, posting
//!    each article as a comment
//!
//! Each session is closed as soon as its phase completes. Only configuration
//! errors are returned; everything network-related ends up in the sink.

use crate::config::{validate, Config};
use crate::crawler::{traverse, Article, CatalogSelectors, ChallengeResolver};
use crate::diagnostics::DiagnosticSink;
use crate::http::{RetryPolicy, RetryingClient, Session, SessionConfig};
use crate::relay::{relay, ApiCredentials, ApiErrorClassifier, PostTarget, RelaySummary};
use crate::Result;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub harvested: usize,
    pub relay: RelaySummary,
}

/// Harvests articles, then relays them to the configured post
///
/// # Errors
///
/// Returns an error only for invalid configuration, before any request is
/// made. Partial or total failure of individual pages and comments is
/// reported through `sink` and reflected in the returned counts.
pub async fn run_pipeline(
    config: &Config,
    access_token: &str,
    sink: Arc<dyn DiagnosticSink>,
) -> Result<PipelineReport> {
    validate(config)?;
    let target = PostTarget::parse(&config.api.post)?;
    let selectors = CatalogSelectors::from_config(&config.selectors)?;

    let articles = harvest(config, &selectors, Arc::clone(&sink)).await?;
    tracing::info!("Harvested {} articles", articles.len());

    let summary = publish(config, &target, access_token, &articles, sink).await?;
    tracing::info!(
        "Posted {} of {} comments ({} failed)",
        summary.posted,
        summary.total(),
        summary.failed
    );

    Ok(PipelineReport {
        harvested: articles.len(),
        relay: summary,
    })
}

/// Runs the catalog phase
pub async fn harvest(
    config: &Config,
    selectors: &CatalogSelectors,
    sink: Arc<dyn DiagnosticSink>,
) -> Result<Vec<Article>> {
    let client = catalog_client(config, Arc::clone(&sink))?;
    let articles = traverse(&client, selectors, &config.catalog.start_url, sink).await;
    client.close();
    Ok(articles)
}

/// Runs the API phase
pub async fn publish(
    config: &Config,
    target: &PostTarget,
    access_token: &str,
    articles: &[Article],
    sink: Arc<dyn DiagnosticSink>,
) -> Result<RelaySummary> {
    let client = api_client(config)?;
    let credentials = ApiCredentials::new(access_token, config.api.version.clone());
    let summary = relay(&client, target, &credentials, articles, sink).await;
    client.close();
    Ok(summary)
}

/// Builds the catalog client: origin of the start URL, user agent, challenge resolver
pub fn catalog_client(config: &Config, sink: Arc<dyn DiagnosticSink>) -> Result<RetryingClient> {
    let base_url = origin_of(&config.catalog.start_url)?;
    let mut session_config = session_config(config, base_url);
    session_config.user_agent = Some(config.catalog.user_agent.clone());

    let session = Session::new(session_config)?;
    let resolver = ChallengeResolver::new(config.catalog.challenge_path.clone(), sink);
    Ok(RetryingClient::new(session, retry_policy(config)).with_evaluator(resolver))
}

/// Builds the API client: API host, form content type, error classifier
pub fn api_client(config: &Config) -> Result<RetryingClient> {
    let base_url = Url::parse(&config.api.base_url)?;
    let mut session_config = session_config(config, base_url);
    session_config.headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );

    let session = Session::new(session_config)?;
    let classifier = ApiErrorClassifier::new(
        config.api.retry_codes.iter().copied(),
        config.api.terminal_codes.iter().copied(),
    );
    Ok(RetryingClient::new(session, retry_policy(config)).with_evaluator(classifier))
}

fn session_config(config: &Config, base_url: Url) -> SessionConfig {
    SessionConfig {
        base_url,
        user_agent: None,
        headers: HeaderMap::new(),
        max_connections: config.network.connections,
        timeout: Duration::from_secs(config.network.timeout_secs),
    }
}

fn retry_policy(config: &Config) -> RetryPolicy {
    RetryPolicy::new(config.network.retries)
        .with_base_delay(Duration::from_millis(config.network.backoff_ms))
}

/// Strips path, query and fragment from a URL
fn origin_of(url: &str) -> Result<Url> {
    let mut base = Url::parse(url)?;
    base.set_path("");
    base.set_query(None);
    base.set_fragment(None);
    Ok(base)
}
