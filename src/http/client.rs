//! Retrying HTTP client
//!
//! Every request issued through a [`RetryingClient`] goes through the same
//! loop:
//!
//! 1. Wait for a connection slot on the session
//! 2. Send the request
//! 3. Transport error or 5xx → retry if attempts remain
//! 4. Otherwise ask the evaluator; [`Verdict::Retry`] → retry if attempts remain
//! 5. Once accepted or out of attempts, a non-2xx status becomes
//!    [`HttpError::Status`]
//!
//! Between attempts the client sleeps for [`RetryPolicy::delay_for`]. The
//! connection slot is released before sleeping.

use crate::http::{AcceptAll, Reply, ResponseEvaluator, RetryPolicy, Session, Verdict};
use crate::{HttpError, HttpResult};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// HTTP client with back-off, response evaluation and a connection ceiling
pub struct RetryingClient {
    session: Session,
    policy: RetryPolicy,
    evaluator: Arc<dyn ResponseEvaluator>,
}

impl RetryingClient {
    /// Creates a client that accepts every reply
    pub fn new(session: Session, policy: RetryPolicy) -> Self {
        Self {
            session,
            policy,
            evaluator: Arc::new(AcceptAll),
        }
    }

    /// Installs the evaluator consulted on every reply
    pub fn with_evaluator<E>(mut self, evaluator: E) -> Self
    where
        E: ResponseEvaluator + 'static,
    {
        self.evaluator = Arc::new(evaluator);
        self
    }

    /// Session backing this client
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Closes the underlying session
    pub fn close(&self) {
        self.session.close();
    }

    /// Issues a GET for an absolute or base-relative target
    pub async fn get(&self, target: &str) -> HttpResult<Reply> {
        let url = self.session.resolve(target)?;
        self.execute(&url, |client| client.get(url.clone())).await
    }

    /// Issues a form-encoded POST for an absolute or base-relative target
    pub async fn post_form<T>(&self, target: &str, form: &T) -> HttpResult<Reply>
    where
        T: Serialize + ?Sized,
    {
        let url = self.session.resolve(target)?;
        self.execute(&url, |client| client.post(url.clone()).form(form))
            .await
    }

    async fn execute<F>(&self, url: &Url, build: F) -> HttpResult<Reply>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let last_attempt = attempt >= max_attempts;

            let permit = self.session.acquire().await?;
            match build(self.session.http()).send().await {
                Err(source) => {
                    drop(permit);
                    if last_attempt {
                        return Err(HttpError::Transport {
                            url: url.to_string(),
                            source,
                        });
                    }
                    tracing::debug!(
                        attempt,
                        max_attempts,
                        error = %source,
                        "Request to {} failed, retrying",
                        url
                    );
                }
                Ok(response) => {
                    let mut reply = Reply::from_response(response, permit);
                    let verdict = if reply.status().is_server_error() {
                        Verdict::Retry
                    } else {
                        self.evaluate(&mut reply).await
                    };

                    if verdict == Verdict::Accept || last_attempt {
                        return check_status(reply);
                    }
                    tracing::debug!(
                        attempt,
                        max_attempts,
                        status = reply.status().as_u16(),
                        "Reply from {} rejected, retrying",
                        reply.url()
                    );
                }
            }

            let delay = self.policy.delay_for(attempt);
            if !delay.is_zero() {
                tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "Backing off");
                tokio::time::sleep(delay).await;
            }
        }
    }

    async fn evaluate(&self, reply: &mut Reply) -> Verdict {
        match self.evaluator.evaluate(reply, &self.session).await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::debug!("Evaluator failed for {}: {}", reply.url(), e);
                Verdict::Retry
            }
        }
    }
}

/// Strict status mode: anything outside 2xx is an error
fn check_status(reply: Reply) -> HttpResult<Reply> {
    if reply.status().is_success() {
        Ok(reply)
    } else {
        Err(HttpError::Status {
            url: reply.url().to_string(),
            status: reply.status().as_u16(),
        })
    }
}
