//! HTML extraction for listing and item pages
//!
//! This module pulls three things out of parsed catalog pages:
//! - Item links from a listing page
//! - The article string from an item page
//! - The pagination plan (page-2..page-N URLs) from the first listing page
//!
//! All extraction is lenient: anything missing is reported to the diagnostic
//! sink and yields an empty result instead of an error.

use crate::config::SelectorConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::{ConfigError, ConfigResult};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Name of the query parameter carrying the page number
const PAGE_PARAM: &str = "page";

/// Parsed document together with the URL it was loaded from
pub struct ListingPage {
    /// Final URL of the page, used to resolve relative links
    pub url: Url,

    /// Parsed document tree
    pub document: Html,
}

impl ListingPage {
    /// Parses `html` leniently; malformed markup never fails
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    /// Page title, or the URL when the page has none
    pub fn label(&self) -> String {
        extract_title(&self.document).unwrap_or_else(|| self.url.to_string())
    }
}

/// Compiled selectors locating catalog structure
#[derive(Debug, Clone)]
pub struct CatalogSelectors {
    pub item_link: Selector,
    pub article: Selector,
    pub last_page: Selector,
}

impl CatalogSelectors {
    /// Compiles the configured selector strings
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSelector`] naming the first selector
    /// that does not parse.
    pub fn from_config(config: &SelectorConfig) -> ConfigResult<Self> {
        Ok(Self {
            item_link: compile(&config.item_link)?,
            article: compile(&config.article)?,
            last_page: compile(&config.last_page)?,
        })
    }
}

/// Compiles one selector string
pub fn compile(selector: &str) -> ConfigResult<Selector> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Extracts absolute item URLs from a listing page
///
/// A page with no matching links yields an empty list and exactly one
/// [`Diagnostic::NoItemLinks`]. Links without an `href` are skipped with a
/// [`Diagnostic::MissingHref`].
pub fn extract_item_links(
    page: &ListingPage,
    selectors: &CatalogSelectors,
    sink: &dyn DiagnosticSink,
) -> Vec<String> {
    let matched: Vec<ElementRef<'_>> = page.document.select(&selectors.item_link).collect();
    if matched.is_empty() {
        sink.warn(Diagnostic::NoItemLinks { page: page.label() });
        return Vec::new();
    }

    let mut links = Vec::with_capacity(matched.len());
    for element in matched {
        match element.value().attr("href") {
            Some(href) => match resolve_link(href, &page.url) {
                Some(url) => links.push(url),
                None => tracing::debug!("Skipping unusable item link '{}'", href),
            },
            None => sink.warn(Diagnostic::MissingHref {
                text: element_text(&element),
            }),
        }
    }
    links
}

/// Extracts the trimmed article string from an item page
///
/// Returns `None` when the article element is absent or its text is empty.
pub fn extract_article(page: &ListingPage, selectors: &CatalogSelectors) -> Option<String> {
    page.document
        .select(&selectors.article)
        .next()
        .map(|element| element_text(&element))
        .filter(|text| !text.is_empty())
}

/// True when the item page has an article element at all
pub fn has_article(page: &ListingPage, selectors: &CatalogSelectors) -> bool {
    page.document.select(&selectors.article).next().is_some()
}

/// Derives the page-2..page-N listing URLs from the last-page link
///
/// No pagination control means a single-page catalog and no diagnostic. A
/// control whose link lacks an `href`, does not resolve, or has a missing or
/// non-numeric `page` parameter yields an empty plan and one
/// [`Diagnostic::PaginationSkipped`].
///
/// All other query parameters of the last-page link are preserved.
pub fn pagination_plan(
    page: &ListingPage,
    selectors: &CatalogSelectors,
    sink: &dyn DiagnosticSink,
) -> Vec<Url> {
    let Some(link) = page.document.select(&selectors.last_page).next() else {
        return Vec::new();
    };

    let Some(href) = link.value().attr("href") else {
        sink.warn(Diagnostic::PaginationSkipped {
            reason: "last page link has no href attribute".to_string(),
        });
        return Vec::new();
    };

    let last_page_url = match page.url.join(href.trim()) {
        Ok(url) => url,
        Err(e) => {
            sink.warn(Diagnostic::PaginationSkipped {
                reason: format!("failed to parse last page url \"{}\": {}", href, e),
            });
            return Vec::new();
        }
    };

    let pairs: Vec<(String, String)> = last_page_url.query_pairs().into_owned().collect();
    let Some((_, raw_last)) = pairs.iter().find(|(key, _)| key == PAGE_PARAM) else {
        sink.warn(Diagnostic::PaginationSkipped {
            reason: format!("there is no ?page in the last page url \"{}\"", href),
        });
        return Vec::new();
    };

    let last: i64 = match raw_last.trim().parse() {
        Ok(n) => n,
        Err(_) => {
            sink.warn(Diagnostic::PaginationSkipped {
                reason: format!("last page \"{}\" is not a number", raw_last),
            });
            return Vec::new();
        }
    };

    // A last page below 2 means there is nothing beyond the first page
    (2..=last)
        .map(|index| with_page(&last_page_url, &pairs, index))
        .collect()
}

/// Rebuilds `url` with the `page` parameter set to `index`
fn with_page(url: &Url, pairs: &[(String, String)], index: i64) -> Url {
    let index = index.to_string();
    let mut page_seen = false;
    let mut next = url.clone();
    {
        let mut query = next.query_pairs_mut();
        query.clear();
        for (key, value) in pairs {
            if key == PAGE_PARAM {
                if !page_seen {
                    query.append_pair(key, &index);
                    page_seen = true;
                }
            } else {
                query.append_pair(key, value);
            }
        }
    }
    next
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element_text(&element))
        .filter(|s| !s.is_empty())
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves a link href to an absolute HTTP(S) URL
///
/// Returns None for empty hrefs, `javascript:`/`mailto:`/`tel:`/`data:`
/// schemes, fragment-only links, and anything that fails to resolve.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}
