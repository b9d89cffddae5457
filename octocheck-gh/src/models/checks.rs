//! # Check Run Models
//!
//! Response and request shapes for the check runs API, plus the status and
//! conclusion enumerations shared with check suites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{GitHubApp, PullRequestRef};
use super::wire::{WireValue, wire_enum};
use crate::error::{GitHubError, Result};
use crate::repo::RepoRef;

wire_enum! {
  /// Lifecycle state of a check run or suite
  pub enum CheckStatus {
    Queued => "queued",
    InProgress => "in_progress",
    Completed => "completed",
  }
}

wire_enum! {
  /// Final outcome of a completed check run or suite
  pub enum CheckConclusion {
    Success => "success",
    Failure => "failure",
    Neutral => "neutral",
    Cancelled => "cancelled",
    TimedOut => "timed_out",
    ActionRequired => "action_required",
    Skipped => "skipped",
    Stale => "stale",
    /// A workflow could not start; reported on check suites
    StartupFailure => "startup_failure",
  }
}

wire_enum! {
  /// Status filter accepted by the check run list endpoints
  pub enum CheckStatusFilter {
    Queued => "queued",
    InProgress => "in_progress",
    Completed => "completed",
  }
}

wire_enum! {
  /// Which runs to return when a check has been re-run
  pub enum CheckRunCompletedAtFilter {
    /// Only the most recent run of each check
    Latest => "latest",
    All => "all",
  }
}

wire_enum! {
  /// Severity of a check run annotation
  pub enum CheckAnnotationLevel {
    Notice => "notice",
    Warning => "warning",
    Failure => "failure",
  }
}

/// Reference to the suite a check run belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSuiteRef {
  pub id: u64,
}

/// Represents a GitHub check run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRun {
  pub id: u64,
  pub head_sha: String,
  pub node_id: Option<String>,
  pub external_id: Option<String>,
  pub url: String,
  pub html_url: Option<String>,
  pub details_url: Option<String>,
  pub status: WireValue<CheckStatus>,
  pub conclusion: Option<WireValue<CheckConclusion>>,
  pub started_at: Option<DateTime<Utc>>,
  pub completed_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub output: CheckRunOutput,
  pub name: String,
  pub check_suite: Option<CheckSuiteRef>,
  pub app: Option<GitHubApp>,
  #[serde(default)]
  pub pull_requests: Vec<PullRequestRef>,
}

impl CheckRun {
  /// The repository this run belongs to, derived from its API URL
  pub fn repository(&self) -> Option<RepoRef> {
    RepoRef::from_url(&self.url)
  }

  pub fn is_completed(&self) -> bool {
    self.status == CheckStatus::Completed
  }
}

/// Output block of a check run as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckRunOutput {
  pub title: Option<String>,
  pub summary: Option<String>,
  pub text: Option<String>,
  #[serde(default)]
  pub annotations_count: u64,
  pub annotations_url: Option<String>,
}

/// An annotation attached to a check run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRunAnnotation {
  pub path: String,
  pub start_line: u32,
  pub end_line: u32,
  pub start_column: Option<u32>,
  pub end_column: Option<u32>,
  pub annotation_level: Option<WireValue<CheckAnnotationLevel>>,
  pub title: Option<String>,
  pub message: Option<String>,
  pub raw_details: Option<String>,
  pub blob_href: Option<String>,
}

/// Paginated envelope returned by the check run list endpoints
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckRunsResponse {
  pub total_count: u64,
  pub check_runs: Vec<CheckRun>,
}

/// Output block sent when creating or updating a check run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCheckRunOutput {
  pub title: String,
  pub summary: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub annotations: Option<Vec<NewCheckRunAnnotation>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub images: Option<Vec<NewCheckRunImage>>,
}

impl NewCheckRunOutput {
  pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      summary: summary.into(),
      text: None,
      annotations: None,
      images: None,
    }
  }
}

/// An annotation sent with a check run output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCheckRunAnnotation {
  pub path: String,
  pub start_line: u32,
  pub end_line: u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_column: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub end_column: Option<u32>,
  pub annotation_level: CheckAnnotationLevel,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub raw_details: Option<String>,
}

/// An image sent with a check run output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCheckRunImage {
  pub alt: String,
  pub image_url: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub caption: Option<String>,
}

/// A button offered to users on the check run page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRunAction {
  pub label: String,
  pub description: String,
  pub identifier: String,
}

/// Payload for creating a check run
///
/// Only `name` and `head_sha` are required. Every `None` field is left out of
/// the request body so the server applies its own default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCheckRun {
  pub name: String,
  pub head_sha: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub external_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<CheckStatus>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub started_at: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub conclusion: Option<CheckConclusion>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub completed_at: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub output: Option<NewCheckRunOutput>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub actions: Option<Vec<CheckRunAction>>,
}

impl NewCheckRun {
  pub fn new(name: impl Into<String>, head_sha: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      head_sha: head_sha.into(),
      details_url: None,
      external_id: None,
      status: None,
      started_at: None,
      conclusion: None,
      completed_at: None,
      output: None,
      actions: None,
    }
  }

  pub fn with_status(mut self, status: CheckStatus) -> Self {
    self.status = Some(status);
    self
  }

  /// Mark the run completed with the given conclusion
  pub fn with_conclusion(mut self, conclusion: CheckConclusion) -> Self {
    self.status = Some(CheckStatus::Completed);
    self.conclusion = Some(conclusion);
    self
  }

  pub fn with_details_url(mut self, details_url: impl Into<String>) -> Self {
    self.details_url = Some(details_url.into());
    self
  }

  pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
    self.external_id = Some(external_id.into());
    self
  }

  pub fn with_output(mut self, output: NewCheckRunOutput) -> Self {
    self.output = Some(output);
    self
  }

  /// Reject a conclusion paired with a non-completed status
  pub fn validate(&self) -> Result<()> {
    validate_conclusion(self.status, self.conclusion)
  }
}

/// Payload for updating a check run
///
/// `None` means "leave unchanged"; `Some(value)` is always sent, even when the
/// value equals the server default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckRunUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub external_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<CheckStatus>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub started_at: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub conclusion: Option<CheckConclusion>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub completed_at: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub output: Option<NewCheckRunOutput>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub actions: Option<Vec<CheckRunAction>>,
}

impl CheckRunUpdate {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn with_status(mut self, status: CheckStatus) -> Self {
    self.status = Some(status);
    self
  }

  /// Mark the run completed with the given conclusion
  pub fn with_conclusion(mut self, conclusion: CheckConclusion) -> Self {
    self.status = Some(CheckStatus::Completed);
    self.conclusion = Some(conclusion);
    self
  }

  pub fn with_output(mut self, output: NewCheckRunOutput) -> Self {
    self.output = Some(output);
    self
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }

  /// Reject a conclusion paired with a non-completed status
  pub fn validate(&self) -> Result<()> {
    validate_conclusion(self.status, self.conclusion)
  }
}

fn validate_conclusion(status: Option<CheckStatus>, conclusion: Option<CheckConclusion>) -> Result<()> {
  match (status, conclusion) {
    (Some(status), Some(conclusion)) if status != CheckStatus::Completed => Err(GitHubError::argument(
      "conclusion",
      format!("'{conclusion}' requires status 'completed', not '{status}'"),
    )),
    _ => Ok(()),
  }
}
