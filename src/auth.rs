//! OAuth bootstrap
//!
//! Without an access token nothing is scraped. Instead the user is sent to
//! the implicit-flow authorize page; after granting access the token appears
//! in the browser's address bar and is passed back with `--token`.

use crate::config::ApiConfig;
use url::Url;

/// Authorize endpoint of the OAuth provider
pub const AUTHORIZE_URL: &str = "https://oauth.vk.com/authorize";

/// Builds the implicit-flow authorize URL for the configured application
pub fn authorize_url(config: &ApiConfig) -> Url {
    let mut url = Url::parse(AUTHORIZE_URL).expect("authorize endpoint is a valid URL");
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id.to_string())
        .append_pair("scope", &config.scope)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("display", "page")
        .append_pair("response_type", "token")
        .append_pair("v", &config.version);
    url
}
