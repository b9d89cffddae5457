use octocheck_test_utils::fixtures::{OWNER, REPO, REPO_ID, check_suite_json, check_suites_page, error_json, preferences_json};
use octocheck_test_utils::links::link_header;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{client_for, expect_no_requests};
use crate::models::{
  CheckConclusion, CheckStatus, CheckSuitePreferenceAutoTrigger, CheckSuitePreferences, CheckSuiteRequest,
  CheckSuiteTriggerRequest, NewCheckSuite, WireValue,
};
use crate::repo::RepoRef;

fn repo() -> RepoRef {
  RepoRef::named(OWNER, REPO)
}

#[tokio::test]
async fn test_get_check_suite() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);

  Mock::given(method("GET"))
    .and(path("/repos/octocat/hello-world/check-suites/5"))
    .respond_with(ResponseTemplate::new(200).set_body_json(check_suite_json(5, "d6fde929", Some("master"))))
    .expect(1)
    .mount(&mock_server)
    .await;

  Mock::given(method("GET"))
    .and(path(format!("/repositories/{REPO_ID}/check-suites/5")))
    .respond_with(ResponseTemplate::new(200).set_body_json(check_suite_json(5, "d6fde929", Some("master"))))
    .expect(1)
    .mount(&mock_server)
    .await;

  let by_name = client.check_suites().get(&repo(), 5).await?;
  let by_id = client.check_suites().get(&RepoRef::id(REPO_ID), 5).await?;

  assert_eq!(by_name, by_id);
  assert_eq!(by_name.head_sha, "d6fde929");
  assert_eq!(by_name.status, Some(WireValue::Known(CheckStatus::Completed)));

  Ok(())
}

#[tokio::test]
async fn test_list_keeps_suites_with_unlisted_tokens() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);

  let mut failed_start = check_suite_json(8, "abc123", Some("main"));
  failed_start["conclusion"] = json!("startup_failure");
  let mut from_the_future = check_suite_json(7, "abc123", Some("main"));
  from_the_future["status"] = json!("waiting");
  from_the_future["conclusion"] = json!("exploded");

  Mock::given(method("GET"))
    .and(path("/repos/octocat/hello-world/commits/abc123/check-suites"))
    .respond_with(ResponseTemplate::new(200).set_body_json(check_suites_page(
      3,
      vec![failed_start, from_the_future, check_suite_json(6, "abc123", Some("main"))],
    )))
    .expect(1)
    .mount(&mock_server)
    .await;

  let response = client
    .check_suites()
    .get_all_for_reference(&repo(), "abc123", None, None)
    .await?;

  assert_eq!(response.check_suites.len(), 3);
  assert_eq!(
    response.check_suites[0].conclusion,
    Some(WireValue::Known(CheckConclusion::StartupFailure))
  );
  let unlisted = &response.check_suites[1];
  assert_eq!(unlisted.status, Some(WireValue::Unknown("waiting".to_string())));
  assert_eq!(unlisted.conclusion.as_ref().map(WireValue::as_str), Some("exploded"));
  assert!(unlisted.conclusion.as_ref().is_some_and(|conclusion| conclusion.parse().is_err()));
  assert_eq!(response.check_suites[2].conclusion, Some(WireValue::Known(CheckConclusion::Neutral)));

  Ok(())
}

#[tokio::test]
async fn test_get_missing_check_suite_is_not_found() {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);

  Mock::given(method("GET"))
    .and(path("/repos/octocat/hello-world/check-suites/99"))
    .respond_with(ResponseTemplate::new(404).set_body_json(error_json("Not Found")))
    .mount(&mock_server)
    .await;

  let error = client.check_suites().get(&repo(), 99).await.unwrap_err();
  assert!(error.is_not_found());
}

#[tokio::test]
async fn test_list_for_reference_across_pages() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);
  let uri = mock_server.uri();
  let suites_path = "/repos/octocat/hello-world/commits/main/check-suites";

  Mock::given(method("GET"))
    .and(path(suites_path))
    .and(query_param("app_id", "1"))
    .and(query_param_is_missing("page"))
    .respond_with(
      ResponseTemplate::new(200)
        .insert_header("link", link_header(&uri, suites_path, "app_id=1", 1, 2).as_str())
        .set_body_json(check_suites_page(2, vec![check_suite_json(7, "abc", Some("main"))])),
    )
    .expect(1)
    .mount(&mock_server)
    .await;

  Mock::given(method("GET"))
    .and(path(suites_path))
    .and(query_param("app_id", "1"))
    .and(query_param("page", "2"))
    .respond_with(ResponseTemplate::new(200).set_body_json(check_suites_page(2, vec![check_suite_json(6, "abc", None)])))
    .expect(1)
    .mount(&mock_server)
    .await;

  let request = CheckSuiteRequest::new().with_app_id(1);
  let response = client
    .check_suites()
    .get_all_for_reference(&repo(), "main", Some(&request), None)
    .await?;

  assert_eq!(response.total_count, 2);
  let ids: Vec<u64> = response.check_suites.iter().map(|suite| suite.id).collect();
  assert_eq!(ids, vec![7, 6]);
  assert_eq!(response.check_suites[1].head_branch, None);

  Ok(())
}

#[tokio::test]
async fn test_update_preferences_echoes_settings() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);

  Mock::given(method("PATCH"))
    .and(path("/repos/octocat/hello-world/check-suites/preferences"))
    .and(body_json(json!({
      "auto_trigger_checks": [
        { "app_id": 1, "setting": false },
        { "app_id": 2, "setting": true }
      ]
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(preferences_json(&[(2, true), (1, false)])))
    .expect(1)
    .mount(&mock_server)
    .await;

  let preferences = CheckSuitePreferences::new(vec![
    CheckSuitePreferenceAutoTrigger::new(1, false),
    CheckSuitePreferenceAutoTrigger::new(2, true),
  ]);
  let response = client.check_suites().update_preferences(&repo(), &preferences).await?;

  assert!(preferences.same_settings(&response.preferences));
  assert_eq!(response.repository.full_name, "octocat/hello-world");

  Ok(())
}

#[tokio::test]
async fn test_create_check_suite() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);

  Mock::given(method("POST"))
    .and(path("/repos/octocat/hello-world/check-suites"))
    .and(body_json(json!({ "head_sha": "abc123" })))
    .respond_with(ResponseTemplate::new(201).set_body_json(check_suite_json(8, "abc123", Some("main"))))
    .expect(1)
    .mount(&mock_server)
    .await;

  let suite = client.check_suites().create(&repo(), &NewCheckSuite::new("abc123")).await?;
  assert_eq!(suite.id, 8);

  Ok(())
}

#[tokio::test]
async fn test_request_returns_acceptance() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);

  Mock::given(method("POST"))
    .and(path("/repos/octocat/hello-world/check-suite-requests"))
    .and(body_json(json!({ "head_sha": "abc123" })))
    .respond_with(ResponseTemplate::new(201))
    .expect(1)
    .mount(&mock_server)
    .await;

  Mock::given(method("POST"))
    .and(path(format!("/repositories/{REPO_ID}/check-suite-requests")))
    .respond_with(ResponseTemplate::new(200))
    .expect(1)
    .mount(&mock_server)
    .await;

  let trigger = CheckSuiteTriggerRequest::new("abc123");
  assert!(client.check_suites().request(&repo(), &trigger).await?);
  assert!(!client.check_suites().request(&RepoRef::id(REPO_ID), &trigger).await?);

  Ok(())
}

#[tokio::test]
async fn test_rerequest() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);

  Mock::given(method("POST"))
    .and(path("/repos/octocat/hello-world/check-suites/5/rerequest"))
    .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
    .expect(1)
    .mount(&mock_server)
    .await;

  assert!(client.check_suites().rerequest(&repo(), 5).await?);

  Ok(())
}

#[tokio::test]
async fn test_invalid_arguments_never_reach_the_server() {
  let mock_server = MockServer::start().await;
  let client = client_for(&mock_server);
  expect_no_requests(&mock_server).await;

  let suites = client.check_suites();
  let duplicate = CheckSuitePreferences::new(vec![
    CheckSuitePreferenceAutoTrigger::new(1, true),
    CheckSuitePreferenceAutoTrigger::new(1, false),
  ]);

  let errors = [
    suites.get(&RepoRef::named("", REPO), 5).await.unwrap_err(),
    suites.get(&repo(), 0).await.unwrap_err(),
    suites.get_all_for_reference(&RepoRef::id(0), "main", None, None).await.unwrap_err(),
    suites.get_all_for_reference(&repo(), " ", None, None).await.unwrap_err(),
    suites.update_preferences(&repo(), &duplicate).await.unwrap_err(),
    suites.create(&repo(), &NewCheckSuite::new("")).await.unwrap_err(),
    suites.request(&RepoRef::named(OWNER, ""), &CheckSuiteTriggerRequest::new("abc")).await.unwrap_err(),
    suites.rerequest(&repo(), 0).await.unwrap_err(),
  ];

  for error in errors {
    assert!(error.is_argument(), "expected an argument error, got {error:?}");
  }
}
