//! Catalog-Relay: harvest catalog articles and relay them as VK comments
//!
//! This crate walks a paginated product catalog, collects the article string
//! from every product page, and posts each one as a separate comment to a
//! social-network post. Both phases run through a retrying HTTP client with
//! a bounded connection budget.

pub mod auth;
pub mod config;
pub mod crawler;
pub mod diagnostics;
pub mod http;
pub mod pipeline;
pub mod relay;

use thiserror::Error;

/// Main error type for Catalog-Relay operations
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Invalid post id '{0}': expected <owner>_<post>")]
    InvalidPost(String),
}

/// Transport-level errors surfaced by the retrying client
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Cannot resolve '{target}' against {base}: {source}")]
    InvalidUrl {
        base: String,
        target: String,
        source: ::url::ParseError,
    },

    #[error("Body of {0} is no longer available")]
    BodyUnavailable(String),

    #[error("Session for {0} is closed")]
    Closed(String),

    #[error("HTTP client error: {0}")]
    Build(#[from] reqwest::Error),
}

/// Errors from the social-network API layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Malformed API reply: {message}")]
    Decode { message: String, body: String },

    #[error("API error {code}: {message}")]
    Remote { code: i64, message: String },
}

/// Result type alias for Catalog-Relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for HTTP operations
pub type HttpResult<T> = std::result::Result<T, HttpError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{traverse, Article};
pub use diagnostics::{CaptureSink, Diagnostic, DiagnosticSink, TracingSink};
pub use http::{RetryPolicy, RetryingClient, Session};
pub use pipeline::run_pipeline;
pub use relay::{relay, PostTarget, RelaySummary};
