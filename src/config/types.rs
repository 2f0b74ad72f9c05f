use crate::crawler::DEFAULT_CHALLENGE_PATH;
use serde::Deserialize;

/// Main configuration structure for Catalog-Relay
///
/// Every section has built-in defaults, so an empty file (or no file at all)
/// is a valid configuration apart from the access token.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub selectors: SelectorConfig,
    pub api: ApiConfig,
    pub network: NetworkConfig,
}

/// Catalog site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Listing page to start harvesting from
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// User-Agent sent to the catalog site
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Path the site redirects challenged requests to
    #[serde(rename = "challenge-path")]
    pub challenge_path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            start_url: "https://sport-marafon.ru/rasprodazha/".to_string(),
            user_agent: concat!("catalog-relay/", env!("CARGO_PKG_VERSION")).to_string(),
            challenge_path: DEFAULT_CHALLENGE_PATH.to_string(),
        }
    }
}

/// CSS selectors locating catalog structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Item links on a listing page (must carry `href`)
    #[serde(rename = "item-link")]
    pub item_link: String,

    /// Article text node on an item page
    pub article: String,

    /// "Last page" link inside the pagination control
    #[serde(rename = "last-page")]
    pub last_page: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            item_link: "#main-catalog .product-list__name".to_string(),
            article: ".catalog-detail__article > span".to_string(),
            last_page: "nav.navigation ul.pagination li:nth-last-child(2) a".to_string(),
        }
    }
}

/// Social-network API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API host
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// API version tag sent as `v`
    pub version: String,

    /// Target post as `<owner>_<post>`
    pub post: String,

    /// Access token; when absent the OAuth authorize URL is shown instead
    #[serde(rename = "access-token")]
    pub access_token: Option<String>,

    /// Error codes that are always retried
    #[serde(rename = "retry-codes")]
    pub retry_codes: Vec<i64>,

    /// Error codes that are never retried
    #[serde(rename = "terminal-codes")]
    pub terminal_codes: Vec<i64>,

    /// OAuth application id
    #[serde(rename = "client-id")]
    pub client_id: u64,

    /// OAuth permission scope
    pub scope: String,

    /// OAuth redirect URI
    #[serde(rename = "redirect-uri")]
    pub redirect_uri: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.vk.com".to_string(),
            version: "5.131".to_string(),
            post: "-45599639_85065".to_string(),
            access_token: None,
            retry_codes: vec![1, 6, 10],
            terminal_codes: vec![5, 9, 29, 223],
            client_id: 51584555,
            scope: "wall".to_string(),
            redirect_uri: "https://oauth.vk.com/blank.html".to_string(),
        }
    }
}

/// Connection budget and retry settings, applied to both sessions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Maximum concurrent connections per session
    pub connections: usize,

    /// Total attempts per request
    pub retries: u32,

    /// Delay after the first failed attempt (milliseconds)
    #[serde(rename = "backoff-ms")]
    pub backoff_ms: u64,

    /// Timeout of a single attempt (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connections: 10,
            retries: 3,
            backoff_ms: 100,
            timeout_secs: 30,
        }
    }
}
