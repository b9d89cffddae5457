use octocheck_test_utils::fixtures::{
  OWNER, REPO, REPO_ID, annotation_json, check_run_json, check_runs_page, completed_check_run_json, error_json,
  validation_error_json,
};
use octocheck_test_utils::links::link_header;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{client_for, expect_no_requests};
use crate::error::GitHubError;
use crate::models::{
  ApiOptions, CheckAnnotationLevel, CheckConclusion, CheckRunRequest, CheckRunUpdate, CheckStatus, CheckStatusFilter,
  NewCheckRun, WireValue,
};
use crate::repo::RepoRef;

fn repo() -> RepoRef {
  RepoRef::named(OWNER, REPO)
}

const RUNS_FOR_SHA: &str = "/repos/octocat/hello-world/commits/abc123/check-runs";

#[tokio::test]
async fn test_create_then_update_then_list() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);

  Mock::given(method("POST"))
    .and(path("/repos/octocat/hello-world/check-runs"))
    .and(header("Authorization", "Bearer test_token"))
    .and(body_json(json!({ "name": "build", "head_sha": "abc123" })))
    .respond_with(ResponseTemplate::new(201).set_body_json(check_run_json(4, "build", "abc123", "queued")))
    .expect(1)
    .mount(&mock_server)
    .await;

  Mock::given(method("PATCH"))
    .and(path("/repos/octocat/hello-world/check-runs/4"))
    .and(body_json(json!({ "name": "build-v2", "status": "in_progress" })))
    .respond_with(ResponseTemplate::new(200).set_body_json(check_run_json(4, "build-v2", "abc123", "in_progress")))
    .expect(1)
    .mount(&mock_server)
    .await;

  Mock::given(method("GET"))
    .and(path(RUNS_FOR_SHA))
    .respond_with(ResponseTemplate::new(200).set_body_json(check_runs_page(
      1,
      vec![check_run_json(4, "build-v2", "abc123", "in_progress")],
    )))
    .expect(1)
    .mount(&mock_server)
    .await;

  let created = client
    .check_runs()
    .create(&repo(), &NewCheckRun::new("build", "abc123"))
    .await?;
  assert_eq!(created.status, CheckStatus::Queued);
  assert_eq!(created.head_sha, "abc123");

  let update = CheckRunUpdate::new()
    .with_name("build-v2")
    .with_status(CheckStatus::InProgress);
  let updated = client.check_runs().update(&repo(), created.id, &update).await?;
  assert_eq!(updated.name, "build-v2");

  let listed = client
    .check_runs()
    .get_all_for_reference(&repo(), "abc123", None, None)
    .await?;
  let run = listed
    .check_runs
    .iter()
    .find(|run| run.id == created.id)
    .expect("updated run is listed");
  assert_eq!(run.name, "build-v2");
  assert_eq!(run.status, CheckStatus::InProgress);
  assert_eq!(run.head_sha, "abc123");

  Ok(())
}

#[tokio::test]
async fn test_repository_id_addressing() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);

  Mock::given(method("GET"))
    .and(path(format!("/repositories/{REPO_ID}/check-runs/4")))
    .respond_with(ResponseTemplate::new(200).set_body_json(completed_check_run_json(4, "build", "abc123", "success")))
    .expect(1)
    .mount(&mock_server)
    .await;

  let run = client.check_runs().get(&RepoRef::id(REPO_ID), 4).await?;
  assert_eq!(run.conclusion, Some(WireValue::Known(CheckConclusion::Success)));
  assert!(run.is_completed());

  Ok(())
}

#[tokio::test]
async fn test_list_follows_every_page_in_order() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);
  let uri = mock_server.uri();

  let pages = [
    vec![check_run_json(3, "lint", "abc123", "completed"), check_run_json(2, "test", "abc123", "completed")],
    vec![check_run_json(1, "build", "abc123", "completed")],
  ];

  Mock::given(method("GET"))
    .and(path(RUNS_FOR_SHA))
    .and(query_param_is_missing("page"))
    .respond_with(
      ResponseTemplate::new(200)
        .insert_header("link", link_header(&uri, RUNS_FOR_SHA, "", 1, 2).as_str())
        .set_body_json(check_runs_page(3, pages[0].clone())),
    )
    .expect(1)
    .mount(&mock_server)
    .await;

  Mock::given(method("GET"))
    .and(path(RUNS_FOR_SHA))
    .and(query_param("page", "2"))
    .respond_with(
      ResponseTemplate::new(200)
        .insert_header("link", link_header(&uri, RUNS_FOR_SHA, "", 2, 2).as_str())
        .set_body_json(check_runs_page(3, pages[1].clone())),
    )
    .expect(1)
    .mount(&mock_server)
    .await;

  let response = client
    .check_runs()
    .get_all_for_reference(&repo(), "abc123", None, None)
    .await?;

  assert_eq!(response.total_count, 3);
  assert_eq!(response.check_runs.len() as u64, response.total_count);
  let ids: Vec<u64> = response.check_runs.iter().map(|run| run.id).collect();
  assert_eq!(ids, vec![3, 2, 1]);

  Ok(())
}

#[tokio::test]
async fn test_page_count_limits_pages_fetched() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);
  let uri = mock_server.uri();

  Mock::given(method("GET"))
    .and(path(RUNS_FOR_SHA))
    .and(query_param("per_page", "1"))
    .and(query_param_is_missing("page"))
    .respond_with(
      ResponseTemplate::new(200)
        .insert_header("link", link_header(&uri, RUNS_FOR_SHA, "per_page=1", 1, 3).as_str())
        .set_body_json(check_runs_page(3, vec![check_run_json(3, "lint", "abc123", "queued")])),
    )
    .expect(1)
    .mount(&mock_server)
    .await;

  Mock::given(method("GET"))
    .and(path(RUNS_FOR_SHA))
    .and(query_param("page", "2"))
    .respond_with(ResponseTemplate::new(200).set_body_json(check_runs_page(3, vec![])))
    .expect(0)
    .mount(&mock_server)
    .await;

  let options = ApiOptions::new().with_page_size(1).with_page_count(1);
  let response = client
    .check_runs()
    .get_all_for_reference(&repo(), "abc123", None, Some(&options))
    .await?;

  assert_eq!(response.total_count, 3);
  assert_eq!(response.check_runs.len(), 1);

  Ok(())
}

#[tokio::test]
async fn test_start_page_and_filters_become_query_params() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);

  Mock::given(method("GET"))
    .and(path("/repos/octocat/hello-world/check-suites/5/check-runs"))
    .and(query_param("check_name", "build"))
    .and(query_param("status", "completed"))
    .and(query_param("per_page", "2"))
    .and(query_param("page", "3"))
    .respond_with(ResponseTemplate::new(200).set_body_json(check_runs_page(
      5,
      vec![completed_check_run_json(1, "build", "abc123", "failure")],
    )))
    .expect(1)
    .mount(&mock_server)
    .await;

  let request = CheckRunRequest::new()
    .with_check_name("build")
    .with_status(CheckStatusFilter::Completed);
  let options = ApiOptions::new().with_page_size(2).with_start_page(3);
  let response = client
    .check_runs()
    .get_all_for_check_suite(&repo(), 5, Some(&request), Some(&options))
    .await?;

  assert_eq!(response.check_runs.len(), 1);
  assert_eq!(response.check_runs[0].conclusion, Some(WireValue::Known(CheckConclusion::Failure)));

  Ok(())
}

#[tokio::test]
async fn test_failed_page_discards_partial_results() {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);
  let uri = mock_server.uri();

  Mock::given(method("GET"))
    .and(path(RUNS_FOR_SHA))
    .and(query_param_is_missing("page"))
    .respond_with(
      ResponseTemplate::new(200)
        .insert_header("link", link_header(&uri, RUNS_FOR_SHA, "", 1, 2).as_str())
        .set_body_json(check_runs_page(2, vec![check_run_json(2, "lint", "abc123", "queued")])),
    )
    .mount(&mock_server)
    .await;

  Mock::given(method("GET"))
    .and(path(RUNS_FOR_SHA))
    .and(query_param("page", "2"))
    .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
    .mount(&mock_server)
    .await;

  let error = client
    .check_runs()
    .get_all_for_reference(&repo(), "abc123", None, None)
    .await
    .unwrap_err();
  assert!(matches!(error, GitHubError::Api { status, .. } if status.as_u16() == 502));
}

#[tokio::test]
async fn test_next_link_to_another_origin_is_not_followed() {
  let mock_server = MockServer::start().await;
  let elsewhere = MockServer::start().await;
  let client = client_for(&mock_server);

  Mock::given(method("GET"))
    .and(path(RUNS_FOR_SHA))
    .respond_with(
      ResponseTemplate::new(200)
        .insert_header("link", link_header(&elsewhere.uri(), RUNS_FOR_SHA, "", 1, 2).as_str())
        .set_body_json(check_runs_page(2, vec![check_run_json(2, "lint", "abc123", "queued")])),
    )
    .expect(1)
    .mount(&mock_server)
    .await;
  expect_no_requests(&elsewhere).await;

  let error = client
    .check_runs()
    .get_all_for_reference(&repo(), "abc123", None, None)
    .await
    .unwrap_err();
  assert!(matches!(error, GitHubError::Api { message, .. } if message.contains("another origin")));
}

#[tokio::test]
async fn test_annotations_follow_pages() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);
  let uri = mock_server.uri();
  let annotations_path = "/repos/octocat/hello-world/check-runs/4/annotations";

  Mock::given(method("GET"))
    .and(path(annotations_path))
    .and(query_param_is_missing("page"))
    .respond_with(
      ResponseTemplate::new(200)
        .insert_header("link", link_header(&uri, annotations_path, "", 1, 2).as_str())
        .set_body_json(json!([annotation_json("README.md", 2, "warning", "Check your spelling for 'banaas'.")])),
    )
    .expect(1)
    .mount(&mock_server)
    .await;

  Mock::given(method("GET"))
    .and(path(annotations_path))
    .and(query_param("page", "2"))
    .respond_with(
      ResponseTemplate::new(200)
        .set_body_json(json!([annotation_json("README.md", 4, "notice", "Check your spelling for 'aples'.")])),
    )
    .expect(1)
    .mount(&mock_server)
    .await;

  let annotations = client.check_runs().get_all_annotations(&repo(), 4, None).await?;
  assert_eq!(annotations.len(), 2);
  assert_eq!(annotations[0].annotation_level, Some(WireValue::Known(CheckAnnotationLevel::Warning)));
  assert_eq!(annotations[1].start_line, 4);

  Ok(())
}

#[tokio::test]
async fn test_invalid_arguments_never_reach_the_server() {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);
  expect_no_requests(&mock_server).await;

  let runs = client.check_runs();
  let new_run = NewCheckRun::new("build", "abc123");

  let errors = [
    runs.create(&RepoRef::named("", REPO), &new_run).await.unwrap_err(),
    runs.create(&RepoRef::named(OWNER, ""), &new_run).await.unwrap_err(),
    runs.create(&RepoRef::id(0), &new_run).await.unwrap_err(),
    runs.create(&repo(), &NewCheckRun::new("", "abc123")).await.unwrap_err(),
    runs.update(&repo(), 0, &CheckRunUpdate::new()).await.unwrap_err(),
    runs
      .update(
        &repo(),
        4,
        &CheckRunUpdate {
          status: Some(CheckStatus::Queued),
          conclusion: Some(CheckConclusion::Success),
          ..CheckRunUpdate::default()
        },
      )
      .await
      .unwrap_err(),
    runs.get(&RepoRef::id(0), 4).await.unwrap_err(),
    runs.get_all_for_reference(&repo(), "", None, None).await.unwrap_err(),
    runs.get_all_for_check_suite(&repo(), 0, None, None).await.unwrap_err(),
    runs
      .get_all_for_reference(&repo(), "main", None, Some(&ApiOptions::new().with_page_count(0)))
      .await
      .unwrap_err(),
    runs.get_all_annotations(&RepoRef::named(OWNER, " "), 4, None).await.unwrap_err(),
  ];

  for error in errors {
    assert!(error.is_argument(), "expected an argument error, got {error:?}");
  }
}

#[tokio::test]
async fn test_error_statuses_are_typed() {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);

  Mock::given(method("GET"))
    .and(path("/repos/octocat/hello-world/check-runs/404"))
    .respond_with(ResponseTemplate::new(404).set_body_json(error_json("Not Found")))
    .mount(&mock_server)
    .await;

  Mock::given(method("POST"))
    .and(path("/repos/octocat/hello-world/check-runs"))
    .respond_with(ResponseTemplate::new(422).set_body_json(validation_error_json("head_sha", "invalid")))
    .mount(&mock_server)
    .await;

  Mock::given(method("GET"))
    .and(path("/repos/octocat/hello-world/check-runs/401"))
    .respond_with(ResponseTemplate::new(401).set_body_json(error_json("Bad credentials")))
    .mount(&mock_server)
    .await;

  Mock::given(method("GET"))
    .and(path("/repos/octocat/hello-world/check-runs/403"))
    .respond_with(
      ResponseTemplate::new(403)
        .insert_header("x-ratelimit-remaining", "0")
        .insert_header("x-ratelimit-reset", "1700000000")
        .set_body_json(error_json("API rate limit exceeded")),
    )
    .mount(&mock_server)
    .await;

  let runs = client.check_runs();

  assert!(runs.get(&repo(), 404).await.unwrap_err().is_not_found());

  match runs.create(&repo(), &NewCheckRun::new("build", "nope")).await {
    Err(GitHubError::Validation { errors, .. }) => assert_eq!(errors[0].field.as_deref(), Some("head_sha")),
    other => panic!("expected a validation error, got {other:?}"),
  }

  assert!(matches!(
    runs.get(&repo(), 401).await,
    Err(GitHubError::Authentication { .. })
  ));

  match runs.get(&repo(), 403).await {
    Err(GitHubError::RateLimit { rate_limit, .. }) => assert_eq!(rate_limit.reset, Some(1_700_000_000)),
    other => panic!("expected a rate limit error, got {other:?}"),
  }
}
