//! # Repository References
//!
//! A repository can be addressed either by `owner/name` or by its numeric id.
//! Both forms resolve to the same path-segment prefix so every operation
//! shares one request-building code path.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{GitHubError, Result};
use crate::request::require_segment;

static GITHUB_REPO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"github\.com[/:]([^/\s]+)/([^/\s#?]+?)(?:\.git)?(?:[/#?].*)?$").expect("Failed to compile GitHub repo regex")
});

static API_REPOS_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"/repos/([^/\s]+)/([^/\s?#]+)").expect("Failed to compile API repos regex"));

static API_REPOSITORIES_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"/repositories/(\d+)(?:[/?#]|$)").expect("Failed to compile API repositories regex"));

/// Addresses a repository by `owner/name` or by numeric id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepoRef {
  Named { owner: String, name: String },
  Id(u64),
}

impl RepoRef {
  pub fn named(owner: impl Into<String>, name: impl Into<String>) -> Self {
    Self::Named {
      owner: owner.into(),
      name: name.into(),
    }
  }

  pub const fn id(id: u64) -> Self {
    Self::Id(id)
  }

  /// Validate the reference and return its leading path segments
  ///
  /// Yields `["repos", owner, name]` or `["repositories", id]`.
  pub fn path_segments(&self) -> Result<Vec<String>> {
    match self {
      Self::Named { owner, name } => Ok(vec![
        "repos".to_string(),
        require_segment("owner", owner)?,
        require_segment("name", name)?,
      ]),
      Self::Id(0) => Err(GitHubError::argument("repository_id", "must be a positive integer")),
      Self::Id(id) => Ok(vec!["repositories".to_string(), id.to_string()]),
    }
  }

  /// Extract a reference from a web, SSH, or API URL
  ///
  /// Matches patterns like:
  /// - `https://github.com/owner/repo` (optionally `.git` or a trailing path)
  /// - `git@github.com:owner/repo.git`
  /// - `https://api.github.com/repos/owner/repo/check-runs/4`
  /// - `https://api.github.com/repositories/42/check-suites/5`
  pub fn from_url(url: &str) -> Option<Self> {
    if let Some(captures) = API_REPOSITORIES_REGEX.captures(url) {
      return captures[1].parse().ok().map(Self::Id);
    }
    if let Some(captures) = API_REPOS_REGEX.captures(url) {
      return Some(Self::named(&captures[1], &captures[2]));
    }
    GITHUB_REPO_REGEX
      .captures(url)
      .map(|captures| Self::named(&captures[1], &captures[2]))
  }
}

impl FromStr for RepoRef {
  type Err = GitHubError;

  fn from_str(value: &str) -> Result<Self> {
    let value = value.trim();
    if value.is_empty() {
      return Err(GitHubError::argument("repository", "must not be empty"));
    }

    if value.chars().all(|c| c.is_ascii_digit()) {
      let id = value
        .parse()
        .map_err(|e| GitHubError::argument("repository", format!("invalid repository id '{value}': {e}")))?;
      return Ok(Self::Id(id));
    }

    if value.contains("github.com") || value.contains("://") {
      return Self::from_url(value)
        .ok_or_else(|| GitHubError::argument("repository", format!("could not extract a repository from '{value}'")));
    }

    match value.split_once('/') {
      Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
        Ok(Self::named(owner, name))
      }
      _ => Err(GitHubError::argument(
        "repository",
        format!("expected OWNER/NAME, a repository id, or a GitHub URL, got '{value}'"),
      )),
    }
  }
}

impl fmt::Display for RepoRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Named { owner, name } => write!(f, "{owner}/{name}"),
      Self::Id(id) => write!(f, "#{id}"),
    }
  }
}

impl From<(&str, &str)> for RepoRef {
  fn from((owner, name): (&str, &str)) -> Self {
    Self::named(owner, name)
  }
}

impl From<u64> for RepoRef {
  fn from(id: u64) -> Self {
    Self::Id(id)
  }
}
