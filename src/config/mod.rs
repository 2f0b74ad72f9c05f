//! Configuration module for Catalog-Relay
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then command-line overrides applied by the binary. Validation runs after
//! the last layer and before any network activity.
//!
//! # Example
//!
//! ```no_run
//! use catalog_relay::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("relay.toml")).unwrap();
//! println!("Relaying to post {}", config.api.post);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, CatalogConfig, Config, NetworkConfig, SelectorConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
