//! # Response Decoder
//!
//! Turns an [`HttpResponse`] into a typed value or a typed [`GitHubError`],
//! and discovers pagination continuation links.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use reqwest::StatusCode;
use reqwest::header::{ETAG, HeaderMap, LINK};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::connection::HttpResponse;
use crate::error::{GitHubError, Result, ValidationDetail};

static LINK_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"<([^>]+)>\s*;\s*rel="([^"]+)""#).expect("Failed to compile Link header regex"));

/// Rate limit state reported by `x-ratelimit-*` headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RateLimit {
  pub limit: Option<u64>,
  pub remaining: Option<u64>,
  /// Epoch seconds at which the window resets
  pub reset: Option<i64>,
}

impl RateLimit {
  pub fn from_headers(headers: &HeaderMap) -> Self {
    Self {
      limit: header_number(headers, "x-ratelimit-limit"),
      remaining: header_number(headers, "x-ratelimit-remaining"),
      reset: header_number(headers, "x-ratelimit-reset"),
    }
  }

  /// The reset time as a timestamp
  pub fn reset_at(&self) -> Option<DateTime<Utc>> {
    self.reset.and_then(|reset| Utc.timestamp_opt(reset, 0).single())
  }
}

/// Metadata of a successful response: rate limit state and paging links
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiInfo {
  pub rate_limit: RateLimit,
  /// `Link` targets keyed by relation (`next`, `last`, ...)
  pub links: BTreeMap<String, String>,
  pub etag: Option<String>,
  /// Scopes granted to the token, from `x-oauth-scopes`
  pub oauth_scopes: Vec<String>,
}

impl ApiInfo {
  pub fn from_headers(headers: &HeaderMap) -> Self {
    Self {
      rate_limit: RateLimit::from_headers(headers),
      links: link_relations(headers),
      etag: header_text(headers, ETAG.as_str()),
      oauth_scopes: header_text(headers, "x-oauth-scopes")
        .map(|scopes| {
          scopes
            .split(',')
            .map(str::trim)
            .filter(|scope| !scope.is_empty())
            .map(str::to_string)
            .collect()
        })
        .unwrap_or_default(),
    }
  }
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
  headers.get(name)?.to_str().ok().map(str::to_string)
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
  headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

#[derive(Deserialize)]
struct ErrorBody {
  message: Option<String>,
  #[serde(default)]
  errors: Vec<ValidationDetail>,
}

fn parse_error_body(body: &str) -> (String, Vec<ValidationDetail>) {
  match serde_json::from_str::<ErrorBody>(body) {
    Ok(ErrorBody { message, errors }) => (message.unwrap_or_else(|| body.to_string()), errors),
    Err(_) => (body.to_string(), Vec::new()),
  }
}

fn is_rate_limited(status: StatusCode, rate_limit: &RateLimit, headers: &HeaderMap, message: &str) -> bool {
  if status == StatusCode::TOO_MANY_REQUESTS {
    return true;
  }
  status == StatusCode::FORBIDDEN
    && (rate_limit.remaining == Some(0)
      || headers.contains_key("retry-after")
      || message.to_ascii_lowercase().contains("rate limit"))
}

/// Map a non-success response to its error kind
pub fn error_for_status(response: &HttpResponse) -> Option<GitHubError> {
  let status = response.status;
  if status.is_success() {
    return None;
  }

  let (message, errors) = parse_error_body(&response.body);
  let rate_limit = RateLimit::from_headers(&response.headers);
  debug!("GitHub responded with HTTP {}: {}", status, message);

  let error = if is_rate_limited(status, &rate_limit, &response.headers, &message) {
    GitHubError::RateLimit {
      status,
      message,
      rate_limit,
    }
  } else {
    match status {
      StatusCode::UNAUTHORIZED => GitHubError::Authentication { message },
      StatusCode::NOT_FOUND => GitHubError::NotFound { message },
      StatusCode::UNPROCESSABLE_ENTITY => GitHubError::Validation { message, errors },
      _ => GitHubError::Api { status, message },
    }
  };
  Some(error)
}

/// Decode a successful response body into `T`, or map the failure status
pub fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
  if let Some(error) = error_for_status(response) {
    return Err(error);
  }

  serde_json::from_str::<T>(&response.body).map_err(|e| {
    // A 2xx body that still carries a GitHub error message
    if let Ok(Some(message)) = serde_json::from_str::<ErrorBody>(&response.body).map(|body| body.message) {
      return GitHubError::Api {
        status: response.status,
        message: format!("Failed to decode response: {message}"),
      };
    }
    GitHubError::Decode(e)
  })
}

/// Every `Link` target keyed by relation; the first target wins on repeats
pub fn link_relations(headers: &HeaderMap) -> BTreeMap<String, String> {
  let mut links = BTreeMap::new();
  for value in headers.get_all(LINK).iter().filter_map(|value| value.to_str().ok()) {
    for captures in LINK_REGEX.captures_iter(value) {
      for rel in captures[2].split_whitespace() {
        links.entry(rel.to_string()).or_insert_with(|| captures[1].to_string());
      }
    }
  }
  links
}

/// The `rel="next"` target of a `Link` header, if any
pub fn next_page_url(headers: &HeaderMap) -> Option<String> {
  link_relations(headers).remove("next")
}
