//! Catalog traversal
//!
//! Walks one listing and all of its pagination pages, fetches every item page
//! they link to, and collects the article strings. Everything after the first
//! listing page is fetched concurrently; the connection ceiling of the
//! client's session bounds how many requests are actually on the wire.

use crate::crawler::fetcher::fetch_page;
use crate::crawler::parser::{
    extract_article, extract_item_links, has_article, pagination_plan, CatalogSelectors,
    ListingPage,
};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::http::RetryingClient;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use url::Url;

/// A harvested identifier string (trimmed, never empty)
pub type Article = String;

/// Harvests articles from a paginated catalog
pub struct CatalogTraverser<'a> {
    client: &'a RetryingClient,
    selectors: &'a CatalogSelectors,
    sink: Arc<dyn DiagnosticSink>,
}

impl<'a> CatalogTraverser<'a> {
    /// Creates a traverser over `client` using `selectors`
    pub fn new(
        client: &'a RetryingClient,
        selectors: &'a CatalogSelectors,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            client,
            selectors,
            sink,
        }
    }

    /// Collects the articles of every item on every listing page
    ///
    /// # Algorithm
    ///
    /// 1. Fetch `start`; if it cannot be loaded the result is empty
    /// 2. Extract its item links and its pagination plan
    /// 3. Concurrently fetch its items and every other listing page (plus
    ///    the items of those pages)
    /// 4. Flatten, dropping items that failed
    ///
    /// No ordering is guaranteed, across or within pages.
    pub async fn traverse(&self, start: &str) -> Vec<Article> {
        let Some(page) = fetch_page(self.client, start, self.sink.as_ref()).await else {
            return Vec::new();
        };
        let (links, plan) = self.scan_first_page(page);
        tracing::info!(
            "Found {} items on the first page and {} more listing pages",
            links.len(),
            plan.len()
        );

        let first_page = self.parse_items(links);
        let other_pages = stream::iter(plan)
            .map(|url| self.parse_listing(url))
            .buffer_unordered(self.fan_out())
            .collect::<Vec<Vec<Article>>>();

        let (first, others) = futures::join!(first_page, other_pages);
        first
            .into_iter()
            .chain(others.into_iter().flatten())
            .collect()
    }

    fn scan_first_page(&self, page: ListingPage) -> (Vec<String>, Vec<Url>) {
        let links = extract_item_links(&page, self.selectors, self.sink.as_ref());
        let plan = pagination_plan(&page, self.selectors, self.sink.as_ref());
        (links, plan)
    }

    /// Fetches one pagination page and its items, without further pagination
    async fn parse_listing(&self, url: Url) -> Vec<Article> {
        let Some(page) = fetch_page(self.client, url.as_str(), self.sink.as_ref()).await else {
            return Vec::new();
        };
        let links = extract_item_links(&page, self.selectors, self.sink.as_ref());
        drop(page);
        self.parse_items(links).await
    }

    async fn parse_items(&self, links: Vec<String>) -> Vec<Article> {
        stream::iter(links)
            .map(|link| self.parse_item(link))
            .buffer_unordered(self.fan_out())
            .filter_map(|article| async move { article })
            .collect()
            .await
    }

    /// Fetches one item page and extracts its article
    async fn parse_item(&self, url: String) -> Option<Article> {
        let page = fetch_page(self.client, &url, self.sink.as_ref()).await?;
        let article = extract_article(&page, self.selectors);
        if article.is_none() && !has_article(&page, self.selectors) {
            self.sink.warn(Diagnostic::ArticleMissing { url });
        }
        article
    }

    fn fan_out(&self) -> usize {
        self.client.session().max_connections().max(1)
    }
}

/// Convenience wrapper around [`CatalogTraverser::traverse`]
pub async fn traverse(
    client: &RetryingClient,
    selectors: &CatalogSelectors,
    start: &str,
    sink: Arc<dyn DiagnosticSink>,
) -> Vec<Article> {
    CatalogTraverser::new(client, selectors, sink)
        .traverse(start)
        .await
}
