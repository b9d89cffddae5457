//! # Client Errors
//!
//! Every fallible operation in this crate returns [`GitHubError`]. Argument
//! errors are raised before any request is built; all other kinds come from the
//! server response or the transport and are surfaced as-is.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::response::RateLimit;

/// Result alias used throughout the client
pub type Result<T> = std::result::Result<T, GitHubError>;

/// A single field-level problem reported with a 422 response
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationDetail {
  pub resource: Option<String>,
  pub field: Option<String>,
  pub code: Option<String>,
  pub message: Option<String>,
}

/// Errors produced by the GitHub client
#[derive(Debug, Error)]
pub enum GitHubError {
  /// Caller input was rejected locally; no request was sent
  #[error("Invalid argument '{name}': {reason}")]
  Argument { name: &'static str, reason: String },

  /// 404: the repository, reference, or entity does not exist
  #[error("Not found: {message}")]
  NotFound { message: String },

  /// 422: the server rejected the payload
  #[error("Validation failed: {message}")]
  Validation {
    message: String,
    errors: Vec<ValidationDetail>,
  },

  /// 403/429 caused by primary or secondary rate limits
  #[error("Rate limit exceeded (HTTP {status}): {message}")]
  RateLimit {
    status: StatusCode,
    message: String,
    rate_limit: RateLimit,
  },

  /// 401: missing or bad credentials
  #[error("Authentication failed: {message}")]
  Authentication { message: String },

  /// Any other non-success status
  #[error("GitHub API error: HTTP {status} - {message}")]
  Api { status: StatusCode, message: String },

  #[error("Failed to send request: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Failed to decode response: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("Invalid URL: {0}")]
  Url(#[from] url::ParseError),

  #[error("Request cancelled")]
  Cancelled,
}

impl GitHubError {
  /// Build an argument error for the named parameter
  pub fn argument(name: &'static str, reason: impl Into<String>) -> Self {
    Self::Argument {
      name,
      reason: reason.into(),
    }
  }

  /// The HTTP status associated with this error, if it came from a response
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
      Self::Validation { .. } => Some(StatusCode::UNPROCESSABLE_ENTITY),
      Self::Authentication { .. } => Some(StatusCode::UNAUTHORIZED),
      Self::Api { status, .. } | Self::RateLimit { status, .. } => Some(*status),
      Self::Transport(error) => error.status(),
      Self::Argument { .. } | Self::Decode(_) | Self::Url(_) | Self::Cancelled => None,
    }
  }

  pub const fn is_argument(&self) -> bool {
    matches!(self, Self::Argument { .. })
  }

  pub const fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }

  pub const fn is_rate_limited(&self) -> bool {
    matches!(self, Self::RateLimit { .. })
  }
}
