//! # Request Builder
//!
//! Pure mapping from a logical operation to a [`RequestDescriptor`]. Every
//! builder validates its path components before producing anything, so a
//! descriptor that exists is always safe to send.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{GitHubError, Result};
use crate::models::{ApiOptions, CheckRunRequest, CheckSuiteRequest};
use crate::repo::RepoRef;

/// Everything needed to issue one API call, independent of the transport
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
  pub method: Method,
  /// Unencoded path segments, joined with `/` by [`RequestDescriptor::path`]
  pub segments: Vec<String>,
  pub query: Vec<(String, String)>,
  pub body: Option<Value>,
}

impl RequestDescriptor {
  fn new(method: Method, segments: Vec<String>) -> Self {
    Self {
      method,
      segments,
      query: Vec::new(),
      body: None,
    }
  }

  fn with_body<T: Serialize>(mut self, body: &T) -> Result<Self> {
    self.body = Some(serde_json::to_value(body)?);
    Ok(self)
  }

  fn with_query(mut self, query: Vec<(String, String)>) -> Self {
    self.query.extend(query);
    self
  }

  /// The percent-encoded path, starting with `/`
  pub fn path(&self) -> String {
    let mut path = String::new();
    for segment in &self.segments {
      path.push('/');
      path.push_str(&urlencoding::encode(segment));
    }
    path
  }

  /// Resolve against an API base URL such as `https://api.github.com`
  ///
  /// A base URL with a path (GitHub Enterprise `/api/v3`) keeps that prefix.
  pub fn url(&self, base_url: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("{}{}", base_url.trim_end_matches('/'), self.path()))?;
    if !self.query.is_empty() {
      url.query_pairs_mut().extend_pairs(self.query.iter());
    }
    Ok(url)
  }
}

/// Types that contribute query parameters to a list request
pub trait QueryParams {
  fn query_params(&self) -> Vec<(String, String)>;
}

impl QueryParams for CheckRunRequest {
  fn query_params(&self) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(check_name) = &self.check_name {
      params.push(("check_name".to_string(), check_name.clone()));
    }
    if let Some(status) = self.status {
      params.push(("status".to_string(), status.to_string()));
    }
    if let Some(filter) = self.filter {
      params.push(("filter".to_string(), filter.to_string()));
    }
    params
  }
}

impl QueryParams for CheckSuiteRequest {
  fn query_params(&self) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(app_id) = self.app_id {
      params.push(("app_id".to_string(), app_id.to_string()));
    }
    if let Some(check_name) = &self.check_name {
      params.push(("check_name".to_string(), check_name.clone()));
    }
    params
  }
}

impl QueryParams for ApiOptions {
  fn query_params(&self) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(page_size) = self.page_size {
      params.push(("per_page".to_string(), page_size.to_string()));
    }
    if let Some(start_page) = self.start_page {
      params.push(("page".to_string(), start_page.to_string()));
    }
    params
  }
}

impl<T: QueryParams> QueryParams for Option<&T> {
  fn query_params(&self) -> Vec<(String, String)> {
    self.map(|params| params.query_params()).unwrap_or_default()
  }
}

/// Reject zero-valued pagination settings
pub fn validate_options(options: Option<&ApiOptions>) -> Result<()> {
  let Some(options) = options else {
    return Ok(());
  };
  for (name, value) in [
    ("page_size", options.page_size),
    ("page_count", options.page_count),
    ("start_page", options.start_page),
  ] {
    if value == Some(0) {
      return Err(GitHubError::argument(name, "must be greater than zero"));
    }
  }
  Ok(())
}

fn require_id(name: &'static str, id: u64) -> Result<String> {
  if id == 0 {
    return Err(GitHubError::argument(name, "must be a positive integer"));
  }
  Ok(id.to_string())
}

fn require_text(name: &'static str, value: &str) -> Result<String> {
  if value.trim().is_empty() {
    return Err(GitHubError::argument(name, "must not be empty"));
  }
  Ok(value.to_string())
}

/// Validate a caller-supplied path segment; it is sent exactly as given
pub(crate) fn require_segment(name: &'static str, value: &str) -> Result<String> {
  let segment = require_text(name, value)?;
  if segment.trim() != segment {
    return Err(GitHubError::argument(name, "must not start or end with whitespace"));
  }
  Ok(segment)
}

fn repo_path(repo: &RepoRef, rest: &[&str]) -> Result<Vec<String>> {
  let mut segments = repo.path_segments()?;
  segments.extend(rest.iter().map(|segment| (*segment).to_string()));
  Ok(segments)
}

fn list_query(filter: impl QueryParams, options: Option<&ApiOptions>) -> Result<Vec<(String, String)>> {
  validate_options(options)?;
  let mut query = filter.query_params();
  query.extend(options.query_params());
  Ok(query)
}

/// Builders for `/check-runs` endpoints
pub mod check_runs {
  use super::*;
  use crate::models::{CheckRunUpdate, NewCheckRun};

  /// `POST {repo}/check-runs`
  pub fn create(repo: &RepoRef, new_check_run: &NewCheckRun) -> Result<RequestDescriptor> {
    let segments = repo_path(repo, &["check-runs"])?;
    require_text("name", &new_check_run.name)?;
    require_text("head_sha", &new_check_run.head_sha)?;
    new_check_run.validate()?;
    RequestDescriptor::new(Method::POST, segments).with_body(new_check_run)
  }

  /// `PATCH {repo}/check-runs/{id}`
  pub fn update(repo: &RepoRef, check_run_id: u64, update: &CheckRunUpdate) -> Result<RequestDescriptor> {
    let mut segments = repo_path(repo, &["check-runs"])?;
    segments.push(require_id("check_run_id", check_run_id)?);
    update.validate()?;
    RequestDescriptor::new(Method::PATCH, segments).with_body(update)
  }

  /// `GET {repo}/check-runs/{id}`
  pub fn get(repo: &RepoRef, check_run_id: u64) -> Result<RequestDescriptor> {
    let mut segments = repo_path(repo, &["check-runs"])?;
    segments.push(require_id("check_run_id", check_run_id)?);
    Ok(RequestDescriptor::new(Method::GET, segments))
  }

  /// `GET {repo}/commits/{reference}/check-runs`
  pub fn list_for_reference(
    repo: &RepoRef,
    reference: &str,
    request: Option<&CheckRunRequest>,
    options: Option<&ApiOptions>,
  ) -> Result<RequestDescriptor> {
    let mut segments = repo_path(repo, &["commits"])?;
    segments.push(require_segment("reference", reference)?);
    segments.push("check-runs".to_string());
    Ok(RequestDescriptor::new(Method::GET, segments).with_query(list_query(request, options)?))
  }

  /// `GET {repo}/check-suites/{id}/check-runs`
  pub fn list_for_check_suite(
    repo: &RepoRef,
    check_suite_id: u64,
    request: Option<&CheckRunRequest>,
    options: Option<&ApiOptions>,
  ) -> Result<RequestDescriptor> {
    let mut segments = repo_path(repo, &["check-suites"])?;
    segments.push(require_id("check_suite_id", check_suite_id)?);
    segments.push("check-runs".to_string());
    Ok(RequestDescriptor::new(Method::GET, segments).with_query(list_query(request, options)?))
  }

  /// `GET {repo}/check-runs/{id}/annotations`
  pub fn list_annotations(repo: &RepoRef, check_run_id: u64, options: Option<&ApiOptions>) -> Result<RequestDescriptor> {
    let mut segments = repo_path(repo, &["check-runs"])?;
    segments.push(require_id("check_run_id", check_run_id)?);
    segments.push("annotations".to_string());
    Ok(RequestDescriptor::new(Method::GET, segments).with_query(list_query(None::<&CheckRunRequest>, options)?))
  }
}

/// Builders for `/check-suites` endpoints
pub mod check_suites {
  use super::*;
  use crate::models::{CheckSuitePreferences, CheckSuiteTriggerRequest, NewCheckSuite};

  /// `GET {repo}/check-suites/{id}`
  pub fn get(repo: &RepoRef, check_suite_id: u64) -> Result<RequestDescriptor> {
    let mut segments = repo_path(repo, &["check-suites"])?;
    segments.push(require_id("check_suite_id", check_suite_id)?);
    Ok(RequestDescriptor::new(Method::GET, segments))
  }

  /// `GET {repo}/commits/{reference}/check-suites`
  pub fn list_for_reference(
    repo: &RepoRef,
    reference: &str,
    request: Option<&CheckSuiteRequest>,
    options: Option<&ApiOptions>,
  ) -> Result<RequestDescriptor> {
    let mut segments = repo_path(repo, &["commits"])?;
    segments.push(require_segment("reference", reference)?);
    segments.push("check-suites".to_string());
    Ok(RequestDescriptor::new(Method::GET, segments).with_query(list_query(request, options)?))
  }

  /// `PATCH {repo}/check-suites/preferences`
  pub fn update_preferences(repo: &RepoRef, preferences: &CheckSuitePreferences) -> Result<RequestDescriptor> {
    let segments = repo_path(repo, &["check-suites", "preferences"])?;
    preferences.validate()?;
    RequestDescriptor::new(Method::PATCH, segments).with_body(preferences)
  }

  /// `POST {repo}/check-suites`
  pub fn create(repo: &RepoRef, new_check_suite: &NewCheckSuite) -> Result<RequestDescriptor> {
    let segments = repo_path(repo, &["check-suites"])?;
    require_text("head_sha", &new_check_suite.head_sha)?;
    RequestDescriptor::new(Method::POST, segments).with_body(new_check_suite)
  }

  /// `POST {repo}/check-suite-requests`
  pub fn request(repo: &RepoRef, trigger: &CheckSuiteTriggerRequest) -> Result<RequestDescriptor> {
    let segments = repo_path(repo, &["check-suite-requests"])?;
    require_text("head_sha", &trigger.head_sha)?;
    RequestDescriptor::new(Method::POST, segments).with_body(trigger)
  }

  /// `POST {repo}/check-suites/{id}/rerequest`
  pub fn rerequest(repo: &RepoRef, check_suite_id: u64) -> Result<RequestDescriptor> {
    let mut segments = repo_path(repo, &["check-suites"])?;
    segments.push(require_id("check_suite_id", check_suite_id)?);
    segments.push("rerequest".to_string());
    Ok(RequestDescriptor::new(Method::POST, segments))
  }
}
