//! # GitHub Checks API Client
//!
//! Typed access to the GitHub Checks REST API (check runs and check suites) in
//! two flavors sharing one request-building core:
//!
//! - [`GitHubClient`]: awaited results, one `async fn` per operation
//! - [`StreamingGitHubClient`]: the same operations as lazily started streams
//!
//! Repositories are addressed by [`RepoRef`], either `owner/name` or numeric
//! id; both forms go through identical validation and serialization.

pub mod auth;
pub mod client;
pub mod connection;
pub mod consts;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod pagination;
pub mod repo;
pub mod request;
pub mod response;
pub mod stream;

// Re-export the clients
pub use auth::{GitHubAuth, resolve_github_auth};
pub use client::{GitHubClient, create_github_client};
pub use connection::{Connection, HttpRequest, HttpResponse, ReqwestConnection, cancellable};
pub use error::{GitHubError, Result};
// Re-export models
pub use models::{
  ApiOptions, CheckAnnotationLevel, CheckConclusion, CheckRun, CheckRunAnnotation, CheckRunCompletedAtFilter, CheckRunRequest, CheckRunUpdate,
  CheckRunsResponse, CheckStatus, CheckStatusFilter, CheckSuite, CheckSuitePreferenceAutoTrigger, CheckSuitePreferences,
  CheckSuitePreferencesResponse, CheckSuiteRequest, CheckSuiteTriggerRequest, CheckSuitesResponse, NewCheckRun,
  NewCheckRunOutput, NewCheckSuite,
};
pub use models::wire::{UnknownToken, WireValue};
pub use repo::RepoRef;
pub use response::{ApiInfo, RateLimit};
pub use stream::StreamingGitHubClient;
