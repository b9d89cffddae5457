//! # Stream Adapter
//!
//! Push-based counterpart of the awaited client. Every operation returns a
//! `'static` [`BoxStream`] built from owned arguments:
//!
//! - nothing is sent until the stream is first polled
//! - single-value operations yield one item and end
//! - list operations yield each element as soon as its page arrives
//! - an error is always the last item; items already yielded stay delivered
//! - dropping the stream drops (and so aborts) any in-flight request
//!
//! Calling an operation again builds a fresh stream that re-issues the
//! request. Argument validation is shared with the awaited client, and an
//! invalid argument surfaces as the stream's only item without any request.

use futures_util::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;

use crate::client::GitHubClient;
use crate::error::{GitHubError, Result};
use crate::models::{
  ApiOptions, CheckRun, CheckRunAnnotation, CheckRunRequest, CheckRunUpdate, CheckRunsResponse, CheckSuite,
  CheckSuitePreferences, CheckSuitePreferencesResponse, CheckSuiteRequest, CheckSuiteTriggerRequest,
  CheckSuitesResponse, NewCheckRun, NewCheckSuite,
};
use crate::pagination::{PageCursor, Paged};
use crate::repo::RepoRef;
use crate::request::{RequestDescriptor, check_runs, check_suites};

/// Stream-returning wrapper around a [`GitHubClient`]
#[derive(Debug, Clone)]
pub struct StreamingGitHubClient {
  client: GitHubClient,
}

impl StreamingGitHubClient {
  pub fn new(client: GitHubClient) -> Self {
    Self { client }
  }

  /// The awaited client this adapter wraps
  pub fn client(&self) -> &GitHubClient {
    &self.client
  }

  pub fn check_runs(&self) -> StreamingCheckRuns {
    StreamingCheckRuns {
      client: self.client.clone(),
    }
  }

  pub fn check_suites(&self) -> StreamingCheckSuites {
    StreamingCheckSuites {
      client: self.client.clone(),
    }
  }
}

impl From<GitHubClient> for StreamingGitHubClient {
  fn from(client: GitHubClient) -> Self {
    Self::new(client)
  }
}

fn failed<T: Send + 'static>(error: GitHubError) -> BoxStream<'static, Result<T>> {
  stream::once(async move { Err(error) }).boxed()
}

fn single<T>(client: GitHubClient, descriptor: Result<RequestDescriptor>) -> BoxStream<'static, Result<T>>
where
  T: DeserializeOwned + Send + 'static,
{
  match descriptor {
    Ok(descriptor) => stream::once(async move { client.execute::<T>(descriptor).await }).boxed(),
    Err(error) => failed(error),
  }
}

fn single_created(client: GitHubClient, descriptor: Result<RequestDescriptor>) -> BoxStream<'static, Result<bool>> {
  match descriptor {
    Ok(descriptor) => stream::once(async move { client.execute_created(descriptor).await }).boxed(),
    Err(error) => failed(error),
  }
}

/// Yield every item of every page, fetching the next page only when needed
fn items<P: Paged>(
  client: GitHubClient,
  descriptor: Result<RequestDescriptor>,
  options: Option<&ApiOptions>,
) -> BoxStream<'static, Result<P::Item>> {
  let cursor = match descriptor.and_then(|descriptor| PageCursor::new(client, &descriptor, options)) {
    Ok(cursor) => cursor,
    Err(error) => return failed(error),
  };

  stream::try_unfold(cursor, |mut cursor| async move {
    let page = cursor.next_page::<P>().await?;
    Ok::<_, GitHubError>(page.map(|page| (page, cursor)))
  })
  .map_ok(|page| stream::iter(page.into_items().into_iter().map(Ok::<_, GitHubError>)))
  .try_flatten()
  .boxed()
}

/// Check run operations as streams
#[derive(Debug, Clone)]
pub struct StreamingCheckRuns {
  client: GitHubClient,
}

impl StreamingCheckRuns {
  pub fn create(&self, repo: &RepoRef, new_check_run: &NewCheckRun) -> BoxStream<'static, Result<CheckRun>> {
    single(self.client.clone(), check_runs::create(repo, new_check_run))
  }

  pub fn update(
    &self,
    repo: &RepoRef,
    check_run_id: u64,
    update: &CheckRunUpdate,
  ) -> BoxStream<'static, Result<CheckRun>> {
    single(self.client.clone(), check_runs::update(repo, check_run_id, update))
  }

  pub fn get(&self, repo: &RepoRef, check_run_id: u64) -> BoxStream<'static, Result<CheckRun>> {
    single(self.client.clone(), check_runs::get(repo, check_run_id))
  }

  pub fn get_all_for_reference(
    &self,
    repo: &RepoRef,
    reference: &str,
    request: Option<&CheckRunRequest>,
    options: Option<&ApiOptions>,
  ) -> BoxStream<'static, Result<CheckRun>> {
    let descriptor = check_runs::list_for_reference(repo, reference, request, options);
    items::<CheckRunsResponse>(self.client.clone(), descriptor, options)
  }

  pub fn get_all_for_check_suite(
    &self,
    repo: &RepoRef,
    check_suite_id: u64,
    request: Option<&CheckRunRequest>,
    options: Option<&ApiOptions>,
  ) -> BoxStream<'static, Result<CheckRun>> {
    let descriptor = check_runs::list_for_check_suite(repo, check_suite_id, request, options);
    items::<CheckRunsResponse>(self.client.clone(), descriptor, options)
  }

  pub fn get_all_annotations(
    &self,
    repo: &RepoRef,
    check_run_id: u64,
    options: Option<&ApiOptions>,
  ) -> BoxStream<'static, Result<CheckRunAnnotation>> {
    let descriptor = check_runs::list_annotations(repo, check_run_id, options);
    items::<Vec<CheckRunAnnotation>>(self.client.clone(), descriptor, options)
  }
}

/// Check suite operations as streams
#[derive(Debug, Clone)]
pub struct StreamingCheckSuites {
  client: GitHubClient,
}

impl StreamingCheckSuites {
  pub fn get(&self, repo: &RepoRef, check_suite_id: u64) -> BoxStream<'static, Result<CheckSuite>> {
    single(self.client.clone(), check_suites::get(repo, check_suite_id))
  }

  pub fn get_all_for_reference(
    &self,
    repo: &RepoRef,
    reference: &str,
    request: Option<&CheckSuiteRequest>,
    options: Option<&ApiOptions>,
  ) -> BoxStream<'static, Result<CheckSuite>> {
    let descriptor = check_suites::list_for_reference(repo, reference, request, options);
    items::<CheckSuitesResponse>(self.client.clone(), descriptor, options)
  }

  pub fn update_preferences(
    &self,
    repo: &RepoRef,
    preferences: &CheckSuitePreferences,
  ) -> BoxStream<'static, Result<CheckSuitePreferencesResponse>> {
    single(self.client.clone(), check_suites::update_preferences(repo, preferences))
  }

  pub fn create(&self, repo: &RepoRef, new_check_suite: &NewCheckSuite) -> BoxStream<'static, Result<CheckSuite>> {
    single(self.client.clone(), check_suites::create(repo, new_check_suite))
  }

  pub fn request(&self, repo: &RepoRef, trigger: &CheckSuiteTriggerRequest) -> BoxStream<'static, Result<bool>> {
    single_created(self.client.clone(), check_suites::request(repo, trigger))
  }

  pub fn rerequest(&self, repo: &RepoRef, check_suite_id: u64) -> BoxStream<'static, Result<bool>> {
    single_created(self.client.clone(), check_suites::rerequest(repo, check_suite_id))
  }
}

#[cfg(test)]
mod tests {
  use octocheck_test_utils::fixtures::{
    OWNER, REPO, annotation_json, check_run_json, check_runs_page, check_suite_json, check_suites_page,
  };
  use octocheck_test_utils::links::link_header;
  use serde_json::json;
  use wiremock::matchers::{any, method, path, query_param, query_param_is_missing};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::auth::GitHubAuth;

  const RUNS_FOR_SHA: &str = "/repos/octocat/hello-world/commits/abc123/check-runs";

  fn streaming_client(mock_server: &MockServer) -> StreamingGitHubClient {
    GitHubClient::new(GitHubAuth::Anonymous)
      .with_base_url(mock_server.uri())
      .into()
  }

  fn repo() -> RepoRef {
    RepoRef::named(OWNER, REPO)
  }

  async fn request_count(mock_server: &MockServer) -> usize {
    mock_server.received_requests().await.map(|requests| requests.len()).unwrap_or_default()
  }

  async fn mount_two_pages(mock_server: &MockServer, second_page: ResponseTemplate) {
    let uri = mock_server.uri();
    Mock::given(method("GET"))
      .and(path(RUNS_FOR_SHA))
      .and(query_param_is_missing("page"))
      .respond_with(
        ResponseTemplate::new(200)
          .insert_header("link", link_header(&uri, RUNS_FOR_SHA, "", 1, 2).as_str())
          .set_body_json(check_runs_page(
            3,
            vec![check_run_json(3, "lint", "abc123", "queued"), check_run_json(2, "test", "abc123", "queued")],
          )),
      )
      .mount(mock_server)
      .await;

    Mock::given(method("GET"))
      .and(path(RUNS_FOR_SHA))
      .and(query_param("page", "2"))
      .respond_with(second_page)
      .mount(mock_server)
      .await;
  }

  #[tokio::test]
  async fn test_nothing_is_sent_until_polled() {
    let mock_server = MockServer::start().await;
    let client = streaming_client(&mock_server);

    Mock::given(method("GET"))
      .and(path("/repos/octocat/hello-world/check-suites/5"))
      .respond_with(ResponseTemplate::new(200).set_body_json(check_suite_json(5, "abc123", Some("main"))))
      .expect(2)
      .mount(&mock_server)
      .await;

    let stream = client.check_suites().get(&repo(), 5);
    assert_eq!(request_count(&mock_server).await, 0);

    let suites: Vec<_> = stream.collect().await;
    assert_eq!(suites.len(), 1);
    assert_eq!(suites[0].as_ref().unwrap().id, 5);
    assert_eq!(request_count(&mock_server).await, 1);

    // A second call re-issues the request
    let again: Vec<_> = client.check_suites().get(&repo(), 5).collect().await;
    assert!(again[0].is_ok());
  }

  #[tokio::test]
  async fn test_list_yields_items_page_by_page() {
    let mock_server = MockServer::start().await;
    let client = streaming_client(&mock_server);
    mount_two_pages(
      &mock_server,
      ResponseTemplate::new(200).set_body_json(check_runs_page(3, vec![check_run_json(1, "build", "abc123", "queued")])),
    )
    .await;

    let mut runs = client.check_runs().get_all_for_reference(&repo(), "abc123", None, None);

    let first = runs.next().await.unwrap().unwrap();
    assert_eq!(first.id, 3);
    let second = runs.next().await.unwrap().unwrap();
    assert_eq!(second.id, 2);
    assert_eq!(request_count(&mock_server).await, 1);

    let third = runs.next().await.unwrap().unwrap();
    assert_eq!(third.id, 1);
    assert_eq!(request_count(&mock_server).await, 2);
    assert!(runs.next().await.is_none());
  }

  #[tokio::test]
  async fn test_error_terminates_after_delivered_items() {
    let mock_server = MockServer::start().await;
    let client = streaming_client(&mock_server);
    mount_two_pages(&mock_server, ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" }))).await;

    let results: Vec<_> = client
      .check_runs()
      .get_all_for_reference(&repo(), "abc123", None, None)
      .collect()
      .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(&results[2], Err(GitHubError::Api { message, .. }) if message == "boom"));
  }

  #[tokio::test]
  async fn test_dropping_the_stream_stops_paging() {
    let mock_server = MockServer::start().await;
    let client = streaming_client(&mock_server);
    mount_two_pages(
      &mock_server,
      ResponseTemplate::new(200).set_body_json(check_runs_page(3, vec![check_run_json(1, "build", "abc123", "queued")])),
    )
    .await;

    let first: Vec<_> = client
      .check_runs()
      .get_all_for_reference(&repo(), "abc123", None, None)
      .take(1)
      .collect()
      .await;

    assert_eq!(first.len(), 1);
    assert_eq!(request_count(&mock_server).await, 1);
  }

  #[tokio::test]
  async fn test_invalid_arguments_yield_single_error_without_requests() {
    let mock_server = MockServer::start().await;
    let client = streaming_client(&mock_server);
    Mock::given(any())
      .respond_with(ResponseTemplate::new(500))
      .expect(0)
      .mount(&mock_server)
      .await;

    let results: Vec<_> = client.check_runs().get(&RepoRef::id(0), 4).collect().await;
    assert_eq!(results.len(), 1);
    assert!(results[0].as_ref().unwrap_err().is_argument());

    let results: Vec<_> = client
      .check_suites()
      .get_all_for_reference(&RepoRef::named("", REPO), "main", None, None)
      .collect()
      .await;
    assert_eq!(results.len(), 1);
    assert!(results[0].as_ref().unwrap_err().is_argument());
  }

  #[tokio::test]
  async fn test_suite_and_annotation_streams() {
    let mock_server = MockServer::start().await;
    let client = streaming_client(&mock_server);

    Mock::given(method("GET"))
      .and(path("/repos/octocat/hello-world/commits/main/check-suites"))
      .respond_with(ResponseTemplate::new(200).set_body_json(check_suites_page(
        2,
        vec![check_suite_json(7, "abc", Some("main")), check_suite_json(6, "abc", Some("main"))],
      )))
      .mount(&mock_server)
      .await;

    Mock::given(method("GET"))
      .and(path("/repos/octocat/hello-world/check-runs/4/annotations"))
      .respond_with(
        ResponseTemplate::new(200).set_body_json(json!([annotation_json("src/lib.rs", 10, "failure", "unused import")])),
      )
      .mount(&mock_server)
      .await;

    Mock::given(method("POST"))
      .and(path("/repos/octocat/hello-world/check-suites/7/rerequest"))
      .respond_with(ResponseTemplate::new(201))
      .mount(&mock_server)
      .await;

    let suites: Vec<_> = client
      .check_suites()
      .get_all_for_reference(&repo(), "main", None, None)
      .collect()
      .await;
    let ids: Vec<u64> = suites.into_iter().map(|suite| suite.unwrap().id).collect();
    assert_eq!(ids, vec![7, 6]);

    let annotations: Vec<_> = client.check_runs().get_all_annotations(&repo(), 4, None).collect().await;
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].as_ref().unwrap().path, "src/lib.rs");

    let accepted: Vec<_> = client.check_suites().rerequest(&repo(), 7).collect().await;
    assert!(matches!(accepted[0], Ok(true)));
  }
}
