//! # Pagination
//!
//! List endpoints return one page at a time and advertise the next page in a
//! `Link` header. [`PageCursor`] walks those links strictly sequentially; the
//! awaited client collects every page, the stream adapter yields items as each
//! page arrives. Links are only followed on the client's own origin, since
//! every request carries the client's credentials.

use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::{Origin, Url};

use crate::client::GitHubClient;
use crate::error::{GitHubError, Result};
use crate::models::{ApiOptions, CheckRunsResponse, CheckSuitesResponse};
use crate::request::RequestDescriptor;
use crate::response::{decode, next_page_url};

/// A single page of a list response
pub trait Paged: DeserializeOwned + Send + 'static {
  type Item: Send + 'static;

  /// Total reported by the server, for envelope responses
  fn total_count(&self) -> Option<u64>;

  fn into_items(self) -> Vec<Self::Item>;

  /// Reassemble a page from concatenated items
  fn from_items(total_count: Option<u64>, items: Vec<Self::Item>) -> Self;
}

impl Paged for CheckRunsResponse {
  type Item = crate::models::CheckRun;

  fn total_count(&self) -> Option<u64> {
    Some(self.total_count)
  }

  fn into_items(self) -> Vec<Self::Item> {
    self.check_runs
  }

  fn from_items(total_count: Option<u64>, items: Vec<Self::Item>) -> Self {
    Self {
      total_count: total_count.unwrap_or(items.len() as u64),
      check_runs: items,
    }
  }
}

impl Paged for CheckSuitesResponse {
  type Item = crate::models::CheckSuite;

  fn total_count(&self) -> Option<u64> {
    Some(self.total_count)
  }

  fn into_items(self) -> Vec<Self::Item> {
    self.check_suites
  }

  fn from_items(total_count: Option<u64>, items: Vec<Self::Item>) -> Self {
    Self {
      total_count: total_count.unwrap_or(items.len() as u64),
      check_suites: items,
    }
  }
}

impl<T: DeserializeOwned + Send + 'static> Paged for Vec<T> {
  type Item = T;

  fn total_count(&self) -> Option<u64> {
    None
  }

  fn into_items(self) -> Vec<T> {
    self
  }

  fn from_items(_total_count: Option<u64>, items: Vec<T>) -> Self {
    items
  }
}

/// Walks `next` links one page at a time
pub struct PageCursor {
  client: GitHubClient,
  origin: Origin,
  next: Option<Url>,
  remaining: Option<u32>,
  fetched: u32,
}

impl PageCursor {
  /// Start at `descriptor`, honoring `options.page_count`
  pub fn new(client: GitHubClient, descriptor: &RequestDescriptor, options: Option<&ApiOptions>) -> Result<Self> {
    let first = descriptor.url(client.base_url())?;
    Ok(Self {
      origin: first.origin(),
      client,
      next: Some(first),
      remaining: options.and_then(|options| options.page_count),
      fetched: 0,
    })
  }

  /// Fetch the next page, or `None` once the server or the page limit says stop
  pub async fn next_page<P: Paged>(&mut self) -> Result<Option<P>> {
    if self.remaining == Some(0) {
      trace!("Page limit reached after {} pages", self.fetched);
      return Ok(None);
    }
    let Some(url) = self.next.take() else {
      return Ok(None);
    };

    debug!("Fetching page {} from {}", self.fetched + 1, url);
    let response = self.client.get_url(url).await?;
    let page = decode::<P>(&response)?;

    self.fetched += 1;
    self.remaining = self.remaining.map(|remaining| remaining.saturating_sub(1));
    self.next = match next_page_url(&response.headers) {
      Some(next) => {
        let next = Url::parse(&next)?;
        if next.origin() != self.origin {
          warn!("Refusing to follow pagination link to {}", next);
          return Err(GitHubError::Api {
            status: response.status,
            message: format!("pagination link points to another origin: {next}"),
          });
        }
        Some(next)
      }
      None => None,
    };
    Ok(Some(page))
  }
}

impl GitHubClient {
  /// Fetch every page of a list response and concatenate the items
  ///
  /// The declared total comes from the first page. Any page error aborts the
  /// whole call and the pages already fetched are discarded.
  pub(crate) async fn get_all_pages<P: Paged>(
    &self,
    descriptor: RequestDescriptor,
    options: Option<&ApiOptions>,
  ) -> Result<P> {
    let mut cursor = PageCursor::new(self.clone(), &descriptor, options)?;
    let mut total_count = None;
    let mut items = Vec::new();

    while let Some(page) = cursor.next_page::<P>().await? {
      if cursor.fetched == 1 {
        total_count = page.total_count();
      }
      items.extend(page.into_items());
    }

    debug!("Fetched {} items across {} pages", items.len(), cursor.fetched);
    Ok(P::from_items(total_count, items))
  }
}
