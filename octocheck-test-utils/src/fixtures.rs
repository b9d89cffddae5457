//! JSON payloads shaped like GitHub Checks API responses.
//!
//! Fixtures are plain [`serde_json::Value`]s so they can be handed straight to
//! `wiremock::ResponseTemplate::set_body_json` and tweaked per test.

use serde_json::{Value, json};

/// Owner used by the fixtures unless a test overrides it
pub const OWNER: &str = "octocat";

/// Repository name used by the fixtures unless a test overrides it
pub const REPO: &str = "hello-world";

/// Repository id used by the fixtures unless a test overrides it
pub const REPO_ID: u64 = 1296269;

/// A minimal repository object
pub fn repository_json(id: u64, owner: &str, name: &str) -> Value {
  json!({
    "id": id,
    "name": name,
    "full_name": format!("{owner}/{name}"),
    "private": false,
    "html_url": format!("https://github.com/{owner}/{name}"),
    "owner": {
      "login": owner,
      "id": 1,
    }
  })
}

/// A GitHub App object
pub fn app_json(id: u64, slug: &str) -> Value {
  json!({
    "id": id,
    "slug": slug,
    "name": slug,
    "owner": { "login": OWNER, "id": 1 }
  })
}

/// A check run in the given status with no conclusion
pub fn check_run_json(id: u64, name: &str, head_sha: &str, status: &str) -> Value {
  json!({
    "id": id,
    "head_sha": head_sha,
    "node_id": format!("MDg6Q2hlY2tSdW4{id}"),
    "external_id": "",
    "url": format!("https://api.github.com/repos/{OWNER}/{REPO}/check-runs/{id}"),
    "html_url": format!("https://github.com/{OWNER}/{REPO}/runs/{id}"),
    "details_url": "https://example.com/details",
    "status": status,
    "conclusion": null,
    "started_at": "2018-05-04T01:14:52Z",
    "completed_at": null,
    "output": {
      "title": null,
      "summary": null,
      "text": null,
      "annotations_count": 0,
      "annotations_url": format!("https://api.github.com/repos/{OWNER}/{REPO}/check-runs/{id}/annotations")
    },
    "name": name,
    "check_suite": { "id": 5 },
    "app": app_json(1, "octoapp"),
    "pull_requests": []
  })
}

/// A completed check run with the given conclusion
pub fn completed_check_run_json(id: u64, name: &str, head_sha: &str, conclusion: &str) -> Value {
  let mut run = check_run_json(id, name, head_sha, "completed");
  run["conclusion"] = json!(conclusion);
  run["completed_at"] = json!("2018-05-04T01:15:30Z");
  run["output"]["title"] = json!("Mighty Readme report");
  run["output"]["summary"] = json!("There are 0 failures, 2 warnings, and 1 notice.");
  run["output"]["annotations_count"] = json!(2);
  run
}

/// A check suite for the given commit
pub fn check_suite_json(id: u64, head_sha: &str, head_branch: Option<&str>) -> Value {
  json!({
    "id": id,
    "node_id": format!("MDEwOkNoZWNrU3VpdGU{id}"),
    "head_branch": head_branch,
    "head_sha": head_sha,
    "status": "completed",
    "conclusion": "neutral",
    "url": format!("https://api.github.com/repos/{OWNER}/{REPO}/check-suites/{id}"),
    "before": "146e867f55c26428e5f9fade55a9bbf5e95a7912",
    "after": head_sha,
    "pull_requests": [],
    "app": app_json(1, "octoapp"),
    "repository": repository_json(REPO_ID, OWNER, REPO),
    "latest_check_runs_count": 1
  })
}

/// A check run annotation
pub fn annotation_json(path: &str, line: u32, level: &str, message: &str) -> Value {
  json!({
    "path": path,
    "start_line": line,
    "end_line": line,
    "start_column": null,
    "end_column": null,
    "annotation_level": level,
    "title": "Spell Checker",
    "message": message,
    "raw_details": null,
    "blob_href": format!("https://github.com/{OWNER}/{REPO}/blob/abc/{path}")
  })
}

/// A `check_runs` envelope page
pub fn check_runs_page(total_count: u64, runs: Vec<Value>) -> Value {
  json!({ "total_count": total_count, "check_runs": runs })
}

/// A `check_suites` envelope page
pub fn check_suites_page(total_count: u64, suites: Vec<Value>) -> Value {
  json!({ "total_count": total_count, "check_suites": suites })
}

/// The body returned for check suite preference updates
pub fn preferences_json(settings: &[(u64, bool)]) -> Value {
  let auto_trigger_checks: Vec<Value> = settings
    .iter()
    .map(|(app_id, setting)| json!({ "app_id": app_id, "setting": setting }))
    .collect();
  json!({
    "preferences": { "auto_trigger_checks": auto_trigger_checks },
    "repository": repository_json(REPO_ID, OWNER, REPO)
  })
}

/// A GitHub error body
pub fn error_json(message: &str) -> Value {
  json!({
    "message": message,
    "documentation_url": "https://docs.github.com/rest/checks"
  })
}

/// A 422 error body with field-level details
pub fn validation_error_json(field: &str, code: &str) -> Value {
  json!({
    "message": "Validation Failed",
    "errors": [{ "resource": "CheckRun", "field": field, "code": code }],
    "documentation_url": "https://docs.github.com/rest/checks/runs#create-a-check-run"
  })
}
