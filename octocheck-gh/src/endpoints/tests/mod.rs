mod check_runs_test;
mod check_suites_test;

use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::auth::GitHubAuth;
use crate::client::GitHubClient;

fn client_for(mock_server: &MockServer) -> GitHubClient {
  GitHubClient::new(GitHubAuth::Token("test_token".to_string())).with_base_url(mock_server.uri())
}

/// Fail the test if any request reaches the server
async fn expect_no_requests(mock_server: &MockServer) {
  Mock::given(any())
    .respond_with(ResponseTemplate::new(500))
    .expect(0)
    .named("no request expected")
    .mount(mock_server)
    .await;
}
