//! VK API wire types
//!
//! Requests are form-encoded; replies are JSON objects carrying either a
//! `response` or an `error` member.

use crate::{ApiError, ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// API method used to post a comment
pub const CREATE_COMMENT_METHOD: &str = "/method/wall.createComment";

/// Separator between owner id and post id in a post reference
pub const POST_SEPARATOR: char = '_';

/// Wall post that comments are relayed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTarget {
    /// Owner of the wall (negative for communities)
    pub owner_id: String,

    /// Post id on that wall
    pub post_id: String,
}

impl PostTarget {
    /// Parses `<owner>_<post>`, e.g. `-45599639_85065`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPost`] unless the value has exactly one
    /// separator with an integer on both sides.
    pub fn parse(value: &str) -> ConfigResult<Self> {
        let invalid = || ConfigError::InvalidPost(value.to_string());

        let mut parts = value.split(POST_SEPARATOR);
        let (Some(owner_id), Some(post_id), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        if owner_id.parse::<i64>().is_err() || post_id.parse::<i64>().is_err() {
            return Err(invalid());
        }

        Ok(Self {
            owner_id: owner_id.to_string(),
            post_id: post_id.to_string(),
        })
    }
}

impl FromStr for PostTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PostTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.owner_id, POST_SEPARATOR, self.post_id)
    }
}

/// Form body of one `wall.createComment` call
#[derive(Serialize)]
pub struct CommentRequest<'a> {
    pub access_token: &'a str,
    pub owner_id: &'a str,
    pub post_id: &'a str,
    pub message: &'a str,
    pub v: &'a str,
}

impl fmt::Debug for CommentRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentRequest")
            .field("access_token", &"<redacted>")
            .field("owner_id", &self.owner_id)
            .field("post_id", &self.post_id)
            .field("message", &self.message)
            .field("v", &self.v)
            .finish()
    }
}

impl<'a> CommentRequest<'a> {
    /// Builds the request for `message` on `target`
    pub fn new(target: &'a PostTarget, message: &'a str, access_token: &'a str, version: &'a str) -> Self {
        Self {
            access_token,
            owner_id: &target.owner_id,
            post_id: &target.post_id,
            message,
            v: version,
        }
    }
}

/// Error object embedded in an API reply
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_code: Option<i64>,

    #[serde(default)]
    pub error_msg: Option<String>,
}

impl ApiErrorBody {
    /// Human-readable description of the error
    pub fn describe(&self) -> String {
        match (&self.error_msg, self.error_code) {
            (Some(message), _) => message.clone(),
            (None, Some(code)) => format!("error code {}", code),
            (None, None) => "unknown error".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawReply {
    #[serde(default)]
    response: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

/// Decoded API reply
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    /// Call succeeded; carries the `response` member (null if absent)
    Success(serde_json::Value),

    /// Call failed with an error object
    Failure(ApiErrorBody),
}

impl ApiReply {
    /// Decodes a reply body
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the body is not a JSON object of
    /// the expected shape.
    pub fn decode(body: &str) -> Result<Self, ApiError> {
        let raw: RawReply = serde_json::from_str(body).map_err(|e| ApiError::Decode {
            message: e.to_string(),
            body: body.to_string(),
        })?;

        Ok(match raw.error {
            Some(error) => ApiReply::Failure(error),
            None => ApiReply::Success(raw.response.unwrap_or(serde_json::Value::Null)),
        })
    }

    /// Converts a failure into an [`ApiError::Remote`]
    pub fn into_result(self) -> Result<serde_json::Value, ApiError> {
        match self {
            ApiReply::Success(value) => Ok(value),
            ApiReply::Failure(error) => Err(ApiError::Remote {
                code: error.error_code.unwrap_or_default(),
                message: error.describe(),
            }),
        }
    }
}
