//! # Check Suite Models

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::checks::{CheckConclusion, CheckStatus};
use super::wire::WireValue;
use super::common::{GitHubApp, PullRequestRef, Repository};
use crate::error::{GitHubError, Result};

/// Represents a GitHub check suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSuite {
  pub id: u64,
  pub node_id: Option<String>,
  /// `None` when the branch has since been deleted
  pub head_branch: Option<String>,
  pub head_sha: String,
  pub status: Option<WireValue<CheckStatus>>,
  pub conclusion: Option<WireValue<CheckConclusion>>,
  pub url: Option<String>,
  pub before: Option<String>,
  pub after: Option<String>,
  #[serde(default)]
  pub pull_requests: Vec<PullRequestRef>,
  pub app: Option<GitHubApp>,
  pub repository: Option<Repository>,
  pub latest_check_runs_count: Option<u64>,
}

/// Paginated envelope returned by the check suite list endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckSuitesResponse {
  pub total_count: u64,
  pub check_suites: Vec<CheckSuite>,
}

/// Payload for manually creating a check suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCheckSuite {
  pub head_sha: String,
}

impl NewCheckSuite {
  pub fn new(head_sha: impl Into<String>) -> Self {
    Self {
      head_sha: head_sha.into(),
    }
  }
}

/// Payload asking the server to create a check suite for a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSuiteTriggerRequest {
  pub head_sha: String,
}

impl CheckSuiteTriggerRequest {
  pub fn new(head_sha: impl Into<String>) -> Self {
    Self {
      head_sha: head_sha.into(),
    }
  }
}

/// Whether an app's suites are created automatically on push
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckSuitePreferenceAutoTrigger {
  pub app_id: u64,
  pub setting: bool,
}

impl CheckSuitePreferenceAutoTrigger {
  pub const fn new(app_id: u64, setting: bool) -> Self {
    Self { app_id, setting }
  }
}

/// Repository-scoped check suite preferences
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckSuitePreferences {
  #[serde(default)]
  pub auto_trigger_checks: Vec<CheckSuitePreferenceAutoTrigger>,
}

impl CheckSuitePreferences {
  pub fn new(auto_trigger_checks: Vec<CheckSuitePreferenceAutoTrigger>) -> Self {
    Self { auto_trigger_checks }
  }

  /// Each app id may appear at most once
  pub fn validate(&self) -> Result<()> {
    let mut seen = HashSet::new();
    for trigger in &self.auto_trigger_checks {
      if trigger.app_id == 0 {
        return Err(GitHubError::argument("app_id", "must be a positive integer"));
      }
      if !seen.insert(trigger.app_id) {
        return Err(GitHubError::argument(
          "auto_trigger_checks",
          format!("app id {} appears more than once", trigger.app_id),
        ));
      }
    }
    Ok(())
  }

  /// Compare as sets of (app id, setting) pairs, ignoring order
  pub fn same_settings(&self, other: &Self) -> bool {
    let left: HashSet<_> = self.auto_trigger_checks.iter().collect();
    let right: HashSet<_> = other.auto_trigger_checks.iter().collect();
    left == right
  }
}

/// Response to a preferences update: the accepted set plus the repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSuitePreferencesResponse {
  pub preferences: CheckSuitePreferences,
  pub repository: Repository,
}
