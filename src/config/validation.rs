use crate::config::types::{ApiConfig, CatalogConfig, Config, NetworkConfig, SelectorConfig};
use crate::crawler::compile;
use crate::relay::PostTarget;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// A missing access token is not an error here; the binary handles it by
/// showing the OAuth authorize URL.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_network_config(&config.network)?;
    validate_catalog_config(&config.catalog)?;
    validate_selector_config(&config.selectors)?;
    validate_api_config(&config.api)?;
    Ok(())
}

/// Validates connection budget and retry settings
fn validate_network_config(config: &NetworkConfig) -> Result<(), ConfigError> {
    if config.connections < 1 || config.connections > 100 {
        return Err(ConfigError::Validation(format!(
            "connections must be between 1 and 100, got {}",
            config.connections
        )));
    }

    if config.retries < 1 {
        return Err(ConfigError::Validation(format!(
            "retries must be >= 1, got {}",
            config.retries
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates catalog site configuration
fn validate_catalog_config(config: &CatalogConfig) -> Result<(), ConfigError> {
    validate_http_url("start_url", &config.start_url)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if !config.challenge_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "challenge_path must start with '/', got '{}'",
            config.challenge_path
        )));
    }

    Ok(())
}

/// Validates that every selector is present and compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (name, selector) in [
        ("item_link", &config.item_link),
        ("article", &config.article),
        ("last_page", &config.last_page),
    ] {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector {} cannot be empty",
                name
            )));
        }
        compile(selector)?;
    }
    Ok(())
}

/// Validates API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    validate_http_url("base_url", &config.base_url)?;

    if config.version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api version cannot be empty".to_string(),
        ));
    }

    PostTarget::parse(&config.post)?;

    if let Some(code) = config
        .retry_codes
        .iter()
        .find(|code| config.terminal_codes.contains(code))
    {
        return Err(ConfigError::Validation(format!(
            "error code {} cannot be both retried and terminal",
            code
        )));
    }

    if let Some(token) = &config.access_token {
        if token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "access_token cannot be blank".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates an absolute http(s) URL with a host
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            name, value
        )));
    }

    Ok(())
}
