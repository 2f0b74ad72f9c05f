//! Per-target HTTP session
//!
//! A session is scoped to one logical target (the catalog site or the API
//! host). It owns the cookie jar that challenge handling writes into and the
//! semaphore that caps concurrent connections for every request issued
//! through it.

use crate::{HttpError, HttpResult};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// Settings used to build a [`Session`]
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL that relative request targets are resolved against
    pub base_url: Url,

    /// User-Agent sent with every request
    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    pub headers: HeaderMap,

    /// Maximum number of requests in flight at once
    pub max_connections: usize,

    /// Timeout for a single attempt
    pub timeout: Duration,
}

impl SessionConfig {
    /// Creates a config with default headers and timeouts
    pub fn new(base_url: Url, max_connections: usize) -> Self {
        Self {
            base_url,
            user_agent: None,
            headers: HeaderMap::new(),
            max_connections,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Cookie jar plus connection pool for one target
#[derive(Debug)]
pub struct Session {
    base_url: Url,
    client: Client,
    cookies: Arc<Jar>,
    connections: Arc<Semaphore>,
    max_connections: usize,
}

impl Session {
    /// Builds a session and its underlying HTTP client
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Build`] if the client cannot be constructed, for
    /// example when the user agent is not a valid header value.
    pub fn new(config: SessionConfig) -> HttpResult<Self> {
        let cookies = Arc::new(Jar::default());
        let max_connections = config.max_connections.max(1);

        let mut builder = Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .default_headers(config.headers)
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(max_connections)
            .gzip(true)
            .brotli(true);

        if let Some(user_agent) = config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(Self {
            base_url: config.base_url,
            client: builder.build()?,
            cookies,
            connections: Arc::new(Semaphore::new(max_connections)),
            max_connections,
        })
    }

    /// Base URL of this session
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an absolute or base-relative target into a full URL
    pub fn resolve(&self, target: &str) -> HttpResult<Url> {
        self.base_url
            .join(target)
            .map_err(|source| HttpError::InvalidUrl {
                base: self.base_url.to_string(),
                target: target.to_string(),
                source,
            })
    }

    /// Merges a `name=value` cookie into the jar, scoped to `url`
    pub fn add_cookie(&self, cookie: &str, url: &Url) {
        self.cookies.add_cookie_str(cookie, url);
    }

    /// Returns the `Cookie` header value the jar would send to `url`
    pub fn cookies_for(&self, url: &Url) -> Option<String> {
        self.cookies
            .cookies(url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Connection ceiling of this session
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// Number of connection slots currently free
    pub fn available_connections(&self) -> usize {
        self.connections.available_permits()
    }

    /// Stops the session from issuing new requests
    ///
    /// In-flight requests keep their connection slot until their reply is
    /// dropped; every later attempt fails with [`HttpError::Closed`].
    pub fn close(&self) {
        self.connections.close();
        tracing::debug!("Closed session for {}", self.base_url);
    }

    #[cfg(test)]
    pub(crate) fn is_closed(&self) -> bool {
        self.connections.is_closed()
    }

    /// Waits for a free connection slot
    pub(crate) async fn acquire(&self) -> HttpResult<OwnedSemaphorePermit> {
        Arc::clone(&self.connections)
            .acquire_owned()
            .await
            .map_err(|_| HttpError::Closed(self.base_url.to_string()))
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.connections.close();
    }
}
