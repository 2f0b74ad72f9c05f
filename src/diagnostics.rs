//! Diagnostic sink for non-fatal warnings
//!
//! Every component that can skip an item, a page, or a comment reports the
//! reason through a [`DiagnosticSink`] handed to it by the caller. The binary
//! uses [`TracingSink`], which forwards to `tracing::warn!`; tests use
//! [`CaptureSink`] to assert on exactly what was reported.

use std::fmt;
use std::sync::{Arc, Mutex};

/// A single non-fatal problem observed while harvesting or relaying
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A page could not be loaded (transport error, status, bad URL)
    PageUnavailable { url: String, error: String },

    /// A listing page contained no item links
    NoItemLinks { page: String },

    /// An item link matched the selector but has no href
    MissingHref { text: String },

    /// An item page has no article element
    ArticleMissing { url: String },

    /// The pagination control exists but could not be turned into a plan
    PaginationSkipped { reason: String },

    /// A challenge page did not carry the expected cookie token
    ChallengeTokenMissing { url: String },

    /// A comment could not be posted
    CommentFailed { message: String, reason: String },

    /// The API answered with something that is not a valid reply
    InvalidApiReply { message: String, body: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::PageUnavailable { url, error } => {
                write!(f, "Failed to load page {}... skip ({})", url, error)
            }
            Diagnostic::NoItemLinks { page } => {
                write!(f, "There are no items at page \"{}\"... skip", page)
            }
            Diagnostic::MissingHref { text } => {
                write!(f, "Item \"{}\" has no href attribute... skip", text)
            }
            Diagnostic::ArticleMissing { url } => {
                write!(f, "Article for item \"{}\" is not found... skip", url)
            }
            Diagnostic::PaginationSkipped { reason } => {
                write!(f, "Pagination skipped: {}", reason)
            }
            Diagnostic::ChallengeTokenMissing { url } => write!(
                f,
                "Failed to pass challenge at {}: js cookie not found... retry",
                url
            ),
            Diagnostic::CommentFailed { message, reason } => {
                write!(f, "Failed to post comment {}... skip ({})", message, reason)
            }
            Diagnostic::InvalidApiReply { message, body } => write!(
                f,
                "Invalid API reply for comment {}... skip ({})",
                message, body
            ),
        }
    }
}

/// Receiver for diagnostics emitted by the core components
pub trait DiagnosticSink: Send + Sync {
    /// Reports a warning-level diagnostic
    fn warn(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `tracing` subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
    }
}

/// Collects diagnostics in memory
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    captured: Arc<Mutex<Vec<Diagnostic>>>,
}

impl CaptureSink {
    /// Creates an empty capture sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything captured so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.captured.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of diagnostics captured so far
    pub fn len(&self) -> usize {
        self.diagnostics().len()
    }

    /// True when nothing has been captured
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CaptureSink {
    fn warn(&self, diagnostic: Diagnostic) {
        tracing::debug!("captured diagnostic: {}", diagnostic);
        match self.captured.lock() {
            Ok(mut guard) => guard.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
