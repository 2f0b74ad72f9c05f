//! Catalog crawling
//!
//! This module contains the harvesting side of the pipeline:
//! - HTML fetching that reports failures as absence
//! - The anti-bot challenge resolver installed on the catalog client
//! - Item link, article and pagination extraction
//! - Concurrent traversal of a listing and its pagination pages

mod challenge;
mod fetcher;
mod parser;
mod traverser;

pub use challenge::{find_js_cookie, ChallengeResolver, DEFAULT_CHALLENGE_PATH};
pub use fetcher::fetch_page;
pub use parser::{
    compile, extract_article, extract_item_links, pagination_plan, CatalogSelectors, ListingPage,
};
pub use traverser::{traverse, Article, CatalogTraverser};
