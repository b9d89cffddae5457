//! # GitHub HTTP Client
//!
//! The awaited-result client. It owns the base URL, credentials, and transport,
//! and hands out per-resource clients via [`GitHubClient::check_runs`] and
//! [`GitHubClient::check_suites`].

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use octocheck_core::ApiConfig;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, trace};
use url::Url;

use crate::auth::GitHubAuth;
use crate::connection::{Connection, HttpRequest, HttpResponse, ReqwestConnection};
use crate::consts::{ACCEPT as ACCEPT_MEDIA_TYPE, API_BASE_URL, API_VERSION, API_VERSION_HEADER, USER_AGENT as DEFAULT_USER_AGENT};
use crate::endpoints::check_runs::CheckRunsClient;
use crate::endpoints::check_suites::CheckSuitesClient;
use crate::error::Result;
use crate::request::RequestDescriptor;
use crate::response::{ApiInfo, decode, error_for_status};

/// Represents a GitHub API client
///
/// Cloning is cheap: clones share the same transport and the same
/// [`GitHubClient::last_api_info`] record.
#[derive(Clone)]
pub struct GitHubClient {
  connection: Arc<dyn Connection>,
  pub(crate) base_url: String,
  pub(crate) auth: GitHubAuth,
  user_agent: String,
  last_api_info: Arc<RwLock<Option<ApiInfo>>>,
}

impl GitHubClient {
  /// Create a new GitHub client against `https://api.github.com`
  pub fn new(auth: GitHubAuth) -> Self {
    Self::with_connection(auth, Arc::new(ReqwestConnection::new()))
  }

  /// Create a client that sends requests through `connection`
  pub fn with_connection(auth: GitHubAuth, connection: Arc<dyn Connection>) -> Self {
    Self {
      connection,
      base_url: API_BASE_URL.to_string(),
      auth,
      user_agent: DEFAULT_USER_AGENT.to_string(),
      last_api_info: Arc::new(RwLock::new(None)),
    }
  }

  /// Create a client from the API configuration file settings
  pub fn from_config(config: &ApiConfig, auth: GitHubAuth) -> Self {
    let mut client = Self::new(auth).with_base_url(&config.base_url);
    if let Some(secs) = config.timeout_secs {
      client = client.with_timeout(Duration::from_secs(secs));
    }
    if let Some(user_agent) = &config.user_agent {
      client = client.with_user_agent(user_agent);
    }
    client
  }

  /// Point the client at another API root (GitHub Enterprise, a mock server)
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into().trim_end_matches('/').to_string();
    self
  }

  pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
    self.user_agent = user_agent.into();
    self
  }

  /// Replace the transport with a `reqwest` connection using a per-request timeout
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.connection = Arc::new(ReqwestConnection::new().with_timeout(timeout));
    self
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn auth(&self) -> &GitHubAuth {
    &self.auth
  }

  /// Rate limit and link metadata of the most recent successful response
  pub fn last_api_info(&self) -> Option<ApiInfo> {
    self
      .last_api_info
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  fn record_api_info(&self, response: &HttpResponse) {
    let info = ApiInfo::from_headers(&response.headers);
    trace!(
      "Rate limit: {:?} of {:?} remaining",
      info.rate_limit.remaining, info.rate_limit.limit
    );
    *self.last_api_info.write().unwrap_or_else(PoisonError::into_inner) = Some(info);
  }

  /// Operations on check runs
  pub fn check_runs(&self) -> CheckRunsClient<'_> {
    CheckRunsClient::new(self)
  }

  /// Operations on check suites
  pub fn check_suites(&self) -> CheckSuitesClient<'_> {
    CheckSuitesClient::new(self)
  }

  /// Test the GitHub connection by fetching the current user
  #[instrument(skip(self), level = "debug")]
  pub async fn test_connection(&self) -> Result<bool> {
    let url = Url::parse(&format!("{}/user", self.base_url))?;
    let response = self.send(Method::GET, url, None).await?;
    Ok(response.status.is_success())
  }

  fn headers(&self) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_MEDIA_TYPE));
    headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));
    match HeaderValue::from_str(&self.user_agent) {
      Ok(value) => {
        headers.insert(USER_AGENT, value);
      }
      Err(_) => {
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
      }
    }
    if let Some(value) = self.auth.header_value() {
      headers.insert(AUTHORIZATION, value);
    }
    headers
  }

  pub(crate) async fn send(&self, method: Method, url: Url, body: Option<Value>) -> Result<HttpResponse> {
    debug!("{} {}", method, url);
    let request = HttpRequest {
      method,
      url,
      headers: self.headers(),
      body,
    };
    let response = self.connection.send(request).await?;
    if response.status.is_success() {
      self.record_api_info(&response);
    }
    Ok(response)
  }

  pub(crate) async fn get_url(&self, url: Url) -> Result<HttpResponse> {
    self.send(Method::GET, url, None).await
  }

  async fn dispatch(&self, descriptor: RequestDescriptor) -> Result<HttpResponse> {
    let url = descriptor.url(&self.base_url)?;
    self.send(descriptor.method, url, descriptor.body).await
  }

  /// Send a descriptor and decode the response body
  pub(crate) async fn execute<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
    let response = self.dispatch(descriptor).await?;
    decode(&response)
  }

  /// Send a descriptor whose only result is acceptance: `true` on 201 Created
  pub(crate) async fn execute_created(&self, descriptor: RequestDescriptor) -> Result<bool> {
    let response = self.dispatch(descriptor).await?;
    if let Some(error) = error_for_status(&response) {
      return Err(error);
    }
    Ok(response.status == StatusCode::CREATED)
  }
}

impl fmt::Debug for GitHubClient {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GitHubClient")
      .field("base_url", &self.base_url)
      .field("auth", &self.auth)
      .field("user_agent", &self.user_agent)
      .finish_non_exhaustive()
  }
}

/// Create a GitHub client from a username and token
pub fn create_github_client(username: &str, token: &str) -> GitHubClient {
  GitHubClient::new(GitHubAuth::Basic {
    username: username.to_string(),
    token: token.to_string(),
  })
}

#[cfg(test)]
mod tests {
  use wiremock::matchers::{header, header_exists, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  /// Test that GitHub client can be created with valid credentials
  #[test]
  fn test_github_client_creation() {
    let client = create_github_client("test_user", "test_token");

    assert_eq!(client.base_url(), "https://api.github.com");
    assert_eq!(
      client.auth,
      GitHubAuth::Basic {
        username: "test_user".to_string(),
        token: "test_token".to_string(),
      }
    );
  }

  #[test]
  fn test_from_config() {
    let config = ApiConfig {
      base_url: "https://ghe.example.com/api/v3/".to_string(),
      timeout_secs: Some(5),
      user_agent: Some("custom-agent".to_string()),
    };
    let client = GitHubClient::from_config(&config, GitHubAuth::Anonymous);

    assert_eq!(client.base_url(), "https://ghe.example.com/api/v3");
    assert_eq!(client.user_agent, "custom-agent");
  }

  #[test]
  fn test_debug_redacts_credentials() {
    let client = GitHubClient::new(GitHubAuth::Token("ghp_secret".to_string()));
    let debug = format!("{client:?}");
    assert!(!debug.contains("ghp_secret"));
    assert!(debug.contains("api.github.com"));
  }

  /// Test that GitHub client sends the expected headers
  #[tokio::test]
  async fn test_github_client_auth() {
    let mock_server = MockServer::start().await;
    let client = GitHubClient::new(GitHubAuth::Token("test_token".to_string())).with_base_url(mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/user"))
      .and(header("Authorization", "Bearer test_token"))
      .and(header("Accept", "application/vnd.github.v3+json"))
      .and(header("X-GitHub-Api-Version", "2022-11-28"))
      .and(header_exists("User-Agent"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
          "login": "testuser",
          "id": 1234
      })))
      .expect(1)
      .mount(&mock_server)
      .await;

    assert!(client.test_connection().await.unwrap());
  }

  #[tokio::test]
  async fn test_last_api_info_tracks_successful_responses() {
    let mock_server = MockServer::start().await;
    let client = GitHubClient::new(GitHubAuth::Token("test_token".to_string())).with_base_url(mock_server.uri());
    let observer = client.clone();

    Mock::given(method("GET"))
      .and(path("/user"))
      .respond_with(
        ResponseTemplate::new(200)
          .insert_header("x-ratelimit-limit", "5000")
          .insert_header("x-ratelimit-remaining", "4999")
          .insert_header("x-ratelimit-reset", "1700000000")
          .set_body_json(serde_json::json!({ "login": "testuser", "id": 1234 })),
      )
      .up_to_n_times(1)
      .mount(&mock_server)
      .await;

    Mock::given(method("GET"))
      .and(path("/user"))
      .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({ "message": "boom" })))
      .mount(&mock_server)
      .await;

    assert_eq!(client.last_api_info(), None);
    assert!(client.test_connection().await.unwrap());

    let info = observer.last_api_info().unwrap();
    assert_eq!(info.rate_limit.limit, Some(5000));
    assert_eq!(info.rate_limit.remaining, Some(4999));
    assert_eq!(info.rate_limit.reset, Some(1_700_000_000));

    // A failed response leaves the last successful record in place
    assert!(!client.test_connection().await.unwrap());
    assert_eq!(client.last_api_info(), Some(info));
  }

  #[tokio::test]
  async fn test_connection_reports_rejected_credentials() {
    let mock_server = MockServer::start().await;
    let client = create_github_client("test_user", "wrong").with_base_url(mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/user"))
      .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({ "message": "Bad credentials" })))
      .mount(&mock_server)
      .await;

    assert!(!client.test_connection().await.unwrap());
  }
}
