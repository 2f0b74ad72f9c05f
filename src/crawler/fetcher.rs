//! HTML document fetcher
//!
//! Loads one page through the retrying client and parses it. Transport
//! failures, strict-status failures and unresolvable URLs are all reported to
//! the diagnostic sink and turned into `None`; callers never see the error.

use crate::crawler::parser::ListingPage;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::http::RetryingClient;

/// Fetches `target` and parses the body as HTML
///
/// `target` may be absolute or relative to the session base URL. The body is
/// parsed regardless of the declared content type.
///
/// # Returns
///
/// * `Some(ListingPage)` - The parsed page and its final URL
/// * `None` - The page could not be loaded; one [`Diagnostic::PageUnavailable`]
///   was emitted
pub async fn fetch_page(
    client: &RetryingClient,
    target: &str,
    sink: &dyn DiagnosticSink,
) -> Option<ListingPage> {
    let mut reply = match client.get(target).await {
        Ok(reply) => reply,
        Err(e) => {
            sink.warn(Diagnostic::PageUnavailable {
                url: target.to_string(),
                error: e.to_string(),
            });
            return None;
        }
    };

    let url = reply.url().clone();
    match reply.text().await {
        Ok(body) => Some(ListingPage::parse(url, body)),
        Err(e) => {
            sink.warn(Diagnostic::PageUnavailable {
                url: target.to_string(),
                error: e.to_string(),
            });
            None
        }
    }
}
