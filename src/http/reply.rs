//! Lazily read HTTP reply

use crate::{HttpError, HttpResult};
use reqwest::StatusCode;
use tokio::sync::OwnedSemaphorePermit;
use url::Url;

/// A response whose body is read on first demand
///
/// The connection slot that produced the reply stays reserved until the
/// reply is dropped.
#[derive(Debug)]
pub struct Reply {
    url: Url,
    status: StatusCode,
    pending: Option<reqwest::Response>,
    text: Option<String>,
    body_read: bool,
    _permit: Option<OwnedSemaphorePermit>,
}

impl Reply {
    pub(crate) fn from_response(response: reqwest::Response, permit: OwnedSemaphorePermit) -> Self {
        Self {
            url: response.url().clone(),
            status: response.status(),
            pending: Some(response),
            text: None,
            body_read: false,
            _permit: Some(permit),
        }
    }

    /// Builds a reply from already known parts
    pub fn from_parts(url: Url, status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            url,
            status,
            pending: None,
            text: Some(body.into()),
            body_read: false,
            _permit: None,
        }
    }

    /// Final URL of the response, after redirects
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// HTTP status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// True once anything asked for the body
    pub fn body_was_read(&self) -> bool {
        self.body_read
    }

    /// Reads the body as text, decoding with the declared charset
    ///
    /// The body is downloaded once; later calls return the buffered text.
    pub async fn text(&mut self) -> HttpResult<&str> {
        self.body_read = true;

        if let Some(response) = self.pending.take() {
            let text = response.text().await.map_err(|source| HttpError::Body {
                url: self.url.to_string(),
                source,
            })?;
            self.text = Some(text);
        }

        self.text
            .as_deref()
            .ok_or_else(|| HttpError::BodyUnavailable(self.url.to_string()))
    }
}
