//! API error classification
//!
//! Installed as the response evaluator of the API client. Replies without an
//! error object are accepted. Error codes are sorted into three classes:
//!
//! | Class    | Default codes       | Verdict |
//! |----------|---------------------|---------|
//! | Retry    | 1, 6, 10            | Retry   |
//! | Terminal | 5, 9, 29, 223       | Accept  |
//! | Unknown  | anything else       | Retry   |
//!
//! Accepting a terminal error stops the retry loop; the relay then reports
//! it. Unknown codes are retried up to the attempt ceiling.

use crate::http::{Reply, ResponseEvaluator, Session, Verdict};
use crate::relay::api::ApiReply;
use crate::RelayError;
use async_trait::async_trait;
use std::collections::HashSet;

/// Class of an API error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient (rate limits, internal errors)
    Retry,
    /// Permanent (auth, permissions, validation)
    Terminal,
    /// Not in either set
    Unknown,
}

/// Response evaluator for the API session
#[derive(Debug, Clone)]
pub struct ApiErrorClassifier {
    retry: HashSet<i64>,
    terminal: HashSet<i64>,
}

impl Default for ApiErrorClassifier {
    fn default() -> Self {
        Self::new([1, 6, 10], [5, 9, 29, 223])
    }
}

impl ApiErrorClassifier {
    /// Creates a classifier from the retry and terminal code sets
    pub fn new(
        retry: impl IntoIterator<Item = i64>,
        terminal: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            retry: retry.into_iter().collect(),
            terminal: terminal.into_iter().collect(),
        }
    }

    /// Classifies an error code; a missing code is unknown
    pub fn classify(&self, code: Option<i64>) -> ErrorClass {
        match code {
            Some(code) if self.retry.contains(&code) => ErrorClass::Retry,
            Some(code) if self.terminal.contains(&code) => ErrorClass::Terminal,
            _ => ErrorClass::Unknown,
        }
    }

    /// Decides whether a decoded reply should be retried
    pub fn verdict_for(&self, reply: &ApiReply) -> Verdict {
        match reply {
            ApiReply::Success(_) => Verdict::Accept,
            ApiReply::Failure(error) => match self.classify(error.error_code) {
                ErrorClass::Terminal => Verdict::Accept,
                ErrorClass::Retry | ErrorClass::Unknown => Verdict::Retry,
            },
        }
    }
}

#[async_trait]
impl ResponseEvaluator for ApiErrorClassifier {
    async fn evaluate(&self, reply: &mut Reply, _session: &Session) -> Result<Verdict, RelayError> {
        let decoded = ApiReply::decode(reply.text().await?)?;
        Ok(self.verdict_for(&decoded))
    }
}
