//! # Transport Seam
//!
//! The client talks to GitHub through a [`Connection`]. The default
//! [`ReqwestConnection`] sends real HTTP requests; tests and embedders can
//! supply their own implementation.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::trace;
use url::Url;

use crate::error::{GitHubError, Result};

/// A fully resolved HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
  pub method: Method,
  pub url: Url,
  pub headers: HeaderMap,
  pub body: Option<Value>,
}

/// A raw HTTP response with the body read to completion
#[derive(Debug, Clone)]
pub struct HttpResponse {
  pub status: StatusCode,
  pub headers: HeaderMap,
  pub body: String,
}

/// Sends requests on behalf of the client
///
/// Implementations must be `Send + Sync` so one connection can be shared by
/// every clone of a client. Dropping the future returned by `send` must abort
/// the call.
#[async_trait]
pub trait Connection: Send + Sync {
  async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`Connection`] backed by a `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct ReqwestConnection {
  client: Client,
  timeout: Option<Duration>,
}

impl ReqwestConnection {
  pub fn new() -> Self {
    Self::default()
  }

  /// Wrap an existing `reqwest` client, e.g. one configured with a proxy
  pub fn from_client(client: Client) -> Self {
    Self { client, timeout: None }
  }

  /// Fail any single request that takes longer than `timeout`
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }
}

#[async_trait]
impl Connection for ReqwestConnection {
  async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
    trace!("Sending {} {}", request.method, request.url);

    let mut builder = self
      .client
      .request(request.method, request.url)
      .headers(request.headers);
    if let Some(timeout) = self.timeout {
      builder = builder.timeout(timeout);
    }
    if let Some(body) = &request.body {
      builder = builder.json(body);
    }

    let response = builder.send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.text().await?;

    trace!("Received HTTP {} ({} bytes)", status, body.len());
    Ok(HttpResponse { status, headers, body })
  }
}

/// Run `future` until it completes or `signal` resolves
///
/// When the signal wins, the in-flight call is dropped (which aborts it) and
/// the result is [`GitHubError::Cancelled`].
pub async fn cancellable<T, F, S>(future: F, signal: S) -> Result<T>
where
  F: Future<Output = Result<T>>,
  S: Future<Output = ()>,
{
  tokio::select! {
    biased;
    () = signal => Err(GitHubError::Cancelled),
    result = future => result,
  }
}
