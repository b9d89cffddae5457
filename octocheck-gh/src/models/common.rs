use serde::{Deserialize, Serialize};

/// Represents the owner of a repository or app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryOwner {
  pub login: String,
  pub id: u64,
}

/// Represents a GitHub repository as embedded in checks payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
  pub id: u64,
  pub name: String,
  pub full_name: String,
  pub owner: RepositoryOwner,
  #[serde(default)]
  pub private: bool,
  pub html_url: Option<String>,
}

/// Represents the GitHub App that owns a check run or suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubApp {
  pub id: u64,
  pub slug: Option<String>,
  pub name: String,
  pub owner: Option<RepositoryOwner>,
}

/// A pull request associated with a check run or suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
  pub id: u64,
  pub number: u64,
  pub url: String,
}
