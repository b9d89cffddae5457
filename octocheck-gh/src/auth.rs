//! Authentication helpers for the GitHub client.
//!
//! This module provides the [`GitHubAuth`] credential type plus convenience
//! functions for loading credentials from the user's environment. Discovery
//! checks the `GITHUB_TOKEN` environment variable first, then the `.netrc`
//! entry for the API host.

use std::fmt;
use std::path::Path;

use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use octocheck_core::consts::ENV_GITHUB_TOKEN;
use octocheck_core::creds::Credentials;
use octocheck_core::creds::netrc::{get_netrc_path, machine_for_api_url, parse_netrc_file};
use reqwest::header::HeaderValue;
use tracing::debug;

/// Credentials sent with every request
#[derive(Clone, Default, PartialEq, Eq)]
pub enum GitHubAuth {
  /// No `Authorization` header; subject to the anonymous rate limit
  #[default]
  Anonymous,
  /// A personal access or installation token
  Token(String),
  /// Username plus token, sent as HTTP basic auth
  Basic { username: String, token: String },
}

impl GitHubAuth {
  /// The `Authorization` header value, marked sensitive
  pub fn header_value(&self) -> Option<HeaderValue> {
    let raw = match self {
      Self::Anonymous => return None,
      Self::Token(token) => format!("Bearer {token}"),
      Self::Basic { username, token } => format!("Basic {}", STANDARD.encode(format!("{username}:{token}"))),
    };
    let mut value = HeaderValue::from_str(&raw).ok()?;
    value.set_sensitive(true);
    Some(value)
  }

  pub const fn is_anonymous(&self) -> bool {
    matches!(self, Self::Anonymous)
  }
}

impl fmt::Debug for GitHubAuth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Anonymous => f.write_str("Anonymous"),
      Self::Token(_) => f.write_str("Token(<redacted>)"),
      Self::Basic { username, .. } => f
        .debug_struct("Basic")
        .field("username", username)
        .field("token", &"<redacted>")
        .finish(),
    }
  }
}

impl From<Credentials> for GitHubAuth {
  fn from(credentials: Credentials) -> Self {
    Self::Basic {
      username: credentials.username,
      token: credentials.password,
    }
  }
}

/// Pick credentials from an environment token or a `.netrc` entry
pub fn auth_from_sources(env_token: Option<String>, netrc: Option<Credentials>) -> GitHubAuth {
  if let Some(token) = env_token.map(|token| token.trim().to_string()).filter(|token| !token.is_empty()) {
    debug!("Using GitHub token from {}", ENV_GITHUB_TOKEN);
    return GitHubAuth::Token(token);
  }
  match netrc {
    Some(credentials) => {
      debug!("Using .netrc credentials for user {}", credentials.username);
      credentials.into()
    }
    None => {
      debug!("No GitHub credentials found, using anonymous access");
      GitHubAuth::Anonymous
    }
  }
}

/// Read the `.netrc` entry for the host behind `api_url`, if the file exists
fn netrc_credentials(home: &Path, api_url: &str) -> Result<Option<Credentials>> {
  let netrc_path = get_netrc_path(home);
  if !netrc_path.exists() {
    return Ok(None);
  }
  parse_netrc_file(&netrc_path, &machine_for_api_url(api_url))
}

/// Resolve credentials for `api_url` from the environment and `.netrc`
pub fn resolve_github_auth(home: &Path, api_url: &str) -> Result<GitHubAuth> {
  let env_token = std::env::var(ENV_GITHUB_TOKEN).ok();
  let netrc = netrc_credentials(home, api_url)?;
  Ok(auth_from_sources(env_token, netrc))
}

/// Check if `.netrc` credentials are available for the API host.
pub fn check_github_credentials(home: &Path, api_url: &str) -> Result<bool> {
  Ok(netrc_credentials(home, api_url)?.is_some())
}
