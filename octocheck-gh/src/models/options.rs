//! Query filters and pagination options for list operations.

use super::checks::{CheckRunCompletedAtFilter, CheckStatusFilter};

/// Filters for listing check runs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckRunRequest {
  pub check_name: Option<String>,
  pub status: Option<CheckStatusFilter>,
  pub filter: Option<CheckRunCompletedAtFilter>,
}

impl CheckRunRequest {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_check_name(mut self, check_name: impl Into<String>) -> Self {
    self.check_name = Some(check_name.into());
    self
  }

  pub fn with_status(mut self, status: CheckStatusFilter) -> Self {
    self.status = Some(status);
    self
  }

  pub fn with_filter(mut self, filter: CheckRunCompletedAtFilter) -> Self {
    self.filter = Some(filter);
    self
  }
}

/// Filters for listing check suites
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckSuiteRequest {
  pub app_id: Option<u64>,
  pub check_name: Option<String>,
}

impl CheckSuiteRequest {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_app_id(mut self, app_id: u64) -> Self {
    self.app_id = Some(app_id);
    self
  }

  pub fn with_check_name(mut self, check_name: impl Into<String>) -> Self {
    self.check_name = Some(check_name.into());
    self
  }
}

/// Pagination controls for list operations
///
/// With every field `None` a list operation follows `next` links until the
/// server reports no more pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApiOptions {
  /// Items per page (`per_page`)
  pub page_size: Option<u32>,
  /// Maximum number of pages to fetch
  pub page_count: Option<u32>,
  /// First page to request (`page`)
  pub start_page: Option<u32>,
}

impl ApiOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_page_size(mut self, page_size: u32) -> Self {
    self.page_size = Some(page_size);
    self
  }

  pub fn with_page_count(mut self, page_count: u32) -> Self {
    self.page_count = Some(page_count);
    self
  }

  pub fn with_start_page(mut self, start_page: u32) -> Self {
    self.start_page = Some(start_page);
    self
  }
}
