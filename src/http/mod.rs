//! HTTP layer shared by the catalog and API phases
//!
//! This module contains:
//! - [`Session`]: cookie jar, connection ceiling, base URL and headers for one target
//! - [`Reply`]: a response whose body is read lazily and at most once
//! - [`RetryPolicy`] and [`ResponseEvaluator`]: when and how often to reissue a request
//! - [`RetryingClient`]: GET/POST with backoff, evaluation and strict status

mod client;
mod reply;
mod retry;
mod session;

pub use client::RetryingClient;
pub use reply::Reply;
pub use retry::{AcceptAll, ResponseEvaluator, RetryPolicy, Verdict};
pub use session::{Session, SessionConfig};
