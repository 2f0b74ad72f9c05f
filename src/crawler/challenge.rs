//! Anti-bot cookie challenge resolver
//!
//! The catalog site sometimes redirects a request to a challenge page whose
//! inline script sets a cookie named `iwaf_js_cookie_<token>`. Browsers run
//! the script and reload; we copy the cookie into the session jar and ask the
//! retrying client to reissue the original request.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::http::{Reply, ResponseEvaluator, Session, Verdict};
use crate::RelayError;
use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};

/// Default path the catalog redirects challenged requests to
pub const DEFAULT_CHALLENGE_PATH: &str = "/iwaf-challenge";

static JS_COOKIE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"iwaf_js_cookie_[^']+").expect("valid js cookie regex"));

/// Finds the challenge cookie (`name=value`) in a challenge page body
pub fn find_js_cookie(body: &str) -> Option<&str> {
    JS_COOKIE_RE.find(body).map(|m| m.as_str())
}

/// Response evaluator for the catalog session
pub struct ChallengeResolver {
    path: String,
    sink: Arc<dyn DiagnosticSink>,
}

impl ChallengeResolver {
    /// Creates a resolver watching for `path`
    pub fn new(path: impl Into<String>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            path: path.into(),
            sink,
        }
    }
}

#[async_trait]
impl ResponseEvaluator for ChallengeResolver {
    async fn evaluate(&self, reply: &mut Reply, session: &Session) -> Result<Verdict, RelayError> {
        // Only the path is inspected; the body is left untouched otherwise
        if reply.url().path() != self.path {
            return Ok(Verdict::Accept);
        }

        let url = reply.url().clone();
        let body = reply.text().await?;
        match find_js_cookie(body) {
            Some(cookie) => {
                tracing::debug!("Passing challenge at {} with cookie {}", url, cookie);
                session.add_cookie(cookie, &url);
            }
            None => self.sink.warn(Diagnostic::ChallengeTokenMissing {
                url: url.to_string(),
            }),
        }
        Ok(Verdict::Retry)
    }
}
