//! Comment relay
//!
//! Posts every article as its own comment. All calls are launched together;
//! the API client's connection ceiling decides how many are on the wire. A
//! failed comment is reported and never affects the others.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::http::RetryingClient;
use crate::relay::api::{ApiReply, CommentRequest, PostTarget, CREATE_COMMENT_METHOD};
use crate::ApiError;
use futures::future::join_all;
use std::sync::Arc;

/// Token and version tag sent with every call
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub access_token: String,
    pub version: String,
}

impl ApiCredentials {
    pub fn new(access_token: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            version: version.into(),
        }
    }
}

/// Outcome counts of one relay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelaySummary {
    pub posted: usize,
    pub failed: usize,
}

impl RelaySummary {
    /// Total number of comments attempted
    pub fn total(&self) -> usize {
        self.posted + self.failed
    }
}

/// Relays messages as comments to one post
pub struct CommentRelay<'a> {
    client: &'a RetryingClient,
    target: &'a PostTarget,
    credentials: &'a ApiCredentials,
    sink: Arc<dyn DiagnosticSink>,
}

impl<'a> CommentRelay<'a> {
    pub fn new(
        client: &'a RetryingClient,
        target: &'a PostTarget,
        credentials: &'a ApiCredentials,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            client,
            target,
            credentials,
            sink,
        }
    }

    /// Posts one comment per message, concurrently
    pub async fn relay_all<S>(&self, messages: &[S]) -> RelaySummary
    where
        S: AsRef<str>,
    {
        let outcomes = join_all(
            messages
                .iter()
                .map(|message| self.post_comment(message.as_ref())),
        )
        .await;

        let posted = outcomes.iter().filter(|posted| **posted).count();
        RelaySummary {
            posted,
            failed: outcomes.len() - posted,
        }
    }

    /// Posts a single comment; returns whether it was accepted
    pub async fn post_comment(&self, message: &str) -> bool {
        let request = CommentRequest::new(
            self.target,
            message,
            &self.credentials.access_token,
            &self.credentials.version,
        );

        let mut reply = match self.client.post_form(CREATE_COMMENT_METHOD, &request).await {
            Ok(reply) => reply,
            Err(e) => {
                self.fail(message, e.to_string());
                return false;
            }
        };

        let body = match reply.text().await {
            Ok(body) => body,
            Err(e) => {
                self.fail(message, e.to_string());
                return false;
            }
        };

        match ApiReply::decode(body).and_then(ApiReply::into_result) {
            Ok(_) => {
                tracing::debug!("Posted comment {} to {}", message, self.target);
                true
            }
            Err(ApiError::Decode { body, .. }) => {
                self.sink.warn(Diagnostic::InvalidApiReply {
                    message: message.to_string(),
                    body,
                });
                false
            }
            Err(ApiError::Remote { message: reason, .. }) => {
                self.fail(message, reason);
                false
            }
        }
    }

    fn fail(&self, message: &str, reason: String) {
        self.sink.warn(Diagnostic::CommentFailed {
            message: message.to_string(),
            reason,
        });
    }
}

/// Convenience wrapper around [`CommentRelay::relay_all`]
pub async fn relay<S>(
    client: &RetryingClient,
    target: &PostTarget,
    credentials: &ApiCredentials,
    messages: &[S],
    sink: Arc<dyn DiagnosticSink>,
) -> RelaySummary
where
    S: AsRef<str>,
{
    CommentRelay::new(client, target, credentials, sink)
        .relay_all(messages)
        .await
}
