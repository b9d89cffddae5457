//! # Check Suite Endpoints

use tracing::instrument;

use crate::client::GitHubClient;
use crate::error::Result;
use crate::models::{
  ApiOptions, CheckSuite, CheckSuitePreferences, CheckSuitePreferencesResponse, CheckSuiteRequest,
  CheckSuiteTriggerRequest, CheckSuitesResponse, NewCheckSuite,
};
use crate::repo::RepoRef;
use crate::request::check_suites;

/// Check suite operations, obtained from [`GitHubClient::check_suites`]
#[derive(Debug, Clone, Copy)]
pub struct CheckSuitesClient<'a> {
  client: &'a GitHubClient,
}

impl<'a> CheckSuitesClient<'a> {
  pub(crate) const fn new(client: &'a GitHubClient) -> Self {
    Self { client }
  }

  /// Get a single check suite; `NotFound` if it does not exist
  #[instrument(skip(self), level = "debug")]
  pub async fn get(&self, repo: &RepoRef, check_suite_id: u64) -> Result<CheckSuite> {
    let descriptor = check_suites::get(repo, check_suite_id)?;
    self.client.execute(descriptor).await
  }

  /// List check suites for a SHA, branch, or tag
  #[instrument(skip(self), level = "debug")]
  pub async fn get_all_for_reference(
    &self,
    repo: &RepoRef,
    reference: &str,
    request: Option<&CheckSuiteRequest>,
    options: Option<&ApiOptions>,
  ) -> Result<CheckSuitesResponse> {
    let descriptor = check_suites::list_for_reference(repo, reference, request, options)?;
    self.client.get_all_pages(descriptor, options).await
  }

  /// Change which apps create check suites automatically
  #[instrument(skip(self), level = "debug")]
  pub async fn update_preferences(
    &self,
    repo: &RepoRef,
    preferences: &CheckSuitePreferences,
  ) -> Result<CheckSuitePreferencesResponse> {
    let descriptor = check_suites::update_preferences(repo, preferences)?;
    self.client.execute(descriptor).await
  }

  /// Create a check suite manually
  #[instrument(skip(self), level = "debug")]
  pub async fn create(&self, repo: &RepoRef, new_check_suite: &NewCheckSuite) -> Result<CheckSuite> {
    let descriptor = check_suites::create(repo, new_check_suite)?;
    self.client.execute(descriptor).await
  }

  /// Ask the server to create a check suite for a commit
  ///
  /// Returns `true` when the server accepted the request with 201 Created.
  #[instrument(skip(self), level = "debug")]
  pub async fn request(&self, repo: &RepoRef, trigger: &CheckSuiteTriggerRequest) -> Result<bool> {
    let descriptor = check_suites::request(repo, trigger)?;
    self.client.execute_created(descriptor).await
  }

  /// Re-run every check in a suite
  #[instrument(skip(self), level = "debug")]
  pub async fn rerequest(&self, repo: &RepoRef, check_suite_id: u64) -> Result<bool> {
    let descriptor = check_suites::rerequest(repo, check_suite_id)?;
    self.client.execute_created(descriptor).await
  }
}
