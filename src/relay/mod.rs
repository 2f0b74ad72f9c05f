//! API relay
//!
//! This module contains the posting side of the pipeline:
//! - VK wire types (post reference, comment request, typed reply)
//! - The error-code classifier installed on the API client
//! - Concurrent, failure-isolated comment posting

mod api;
mod classifier;
mod poster;

pub use api::{
    ApiErrorBody, ApiReply, CommentRequest, PostTarget, CREATE_COMMENT_METHOD, POST_SEPARATOR,
};
pub use classifier::{ApiErrorClassifier, ErrorClass};
pub use poster::{relay, ApiCredentials, CommentRelay, RelaySummary};
