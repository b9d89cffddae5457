//! # Check Run Endpoints
//!
//! Awaited-result operations for `/check-runs`. Each operation validates its
//! arguments through the request builder before any network call is made.

use tracing::instrument;

use crate::client::GitHubClient;
use crate::error::Result;
use crate::models::{
  ApiOptions, CheckRun, CheckRunAnnotation, CheckRunRequest, CheckRunUpdate, CheckRunsResponse, NewCheckRun,
};
use crate::repo::RepoRef;
use crate::request::check_runs;

/// Check run operations, obtained from [`GitHubClient::check_runs`]
#[derive(Debug, Clone, Copy)]
pub struct CheckRunsClient<'a> {
  client: &'a GitHubClient,
}

impl<'a> CheckRunsClient<'a> {
  pub(crate) const fn new(client: &'a GitHubClient) -> Self {
    Self { client }
  }

  /// Create a check run for a commit
  #[instrument(skip(self, new_check_run), fields(name = %new_check_run.name), level = "debug")]
  pub async fn create(&self, repo: &RepoRef, new_check_run: &NewCheckRun) -> Result<CheckRun> {
    let descriptor = check_runs::create(repo, new_check_run)?;
    self.client.execute(descriptor).await
  }

  /// Update a check run; `None` fields are left unchanged
  #[instrument(skip(self, update), level = "debug")]
  pub async fn update(&self, repo: &RepoRef, check_run_id: u64, update: &CheckRunUpdate) -> Result<CheckRun> {
    let descriptor = check_runs::update(repo, check_run_id, update)?;
    self.client.execute(descriptor).await
  }

  /// Get a single check run
  #[instrument(skip(self), level = "debug")]
  pub async fn get(&self, repo: &RepoRef, check_run_id: u64) -> Result<CheckRun> {
    let descriptor = check_runs::get(repo, check_run_id)?;
    self.client.execute(descriptor).await
  }

  /// List check runs for a SHA, branch, or tag
  ///
  /// Without `options` every page is fetched.
  #[instrument(skip(self), level = "debug")]
  pub async fn get_all_for_reference(
    &self,
    repo: &RepoRef,
    reference: &str,
    request: Option<&CheckRunRequest>,
    options: Option<&ApiOptions>,
  ) -> Result<CheckRunsResponse> {
    let descriptor = check_runs::list_for_reference(repo, reference, request, options)?;
    self.client.get_all_pages(descriptor, options).await
  }

  /// List check runs in a check suite
  #[instrument(skip(self), level = "debug")]
  pub async fn get_all_for_check_suite(
    &self,
    repo: &RepoRef,
    check_suite_id: u64,
    request: Option<&CheckRunRequest>,
    options: Option<&ApiOptions>,
  ) -> Result<CheckRunsResponse> {
    let descriptor = check_runs::list_for_check_suite(repo, check_suite_id, request, options)?;
    self.client.get_all_pages(descriptor, options).await
  }

  /// List annotations for a check run
  #[instrument(skip(self), level = "debug")]
  pub async fn get_all_annotations(
    &self,
    repo: &RepoRef,
    check_run_id: u64,
    options: Option<&ApiOptions>,
  ) -> Result<Vec<CheckRunAnnotation>> {
    let descriptor = check_runs::list_annotations(repo, check_run_id, options)?;
    self.client.get_all_pages(descriptor, options).await
  }
}
