//! Constants for the octocheck-gh client

/// Base URL for the official SaaS GitHub API
pub const API_BASE_URL: &str = "https://api.github.com";

/// User-Agent header value for the GitHub API client
pub const USER_AGENT: &str = concat!("octocheck/", env!("CARGO_PKG_VERSION"));

/// Accept header value for the GitHub API
pub const ACCEPT: &str = "application/vnd.github.v3+json";

/// Header pinning the REST API version
pub const API_VERSION_HEADER: &str = "x-github-api-version";

/// REST API version this client is written against
pub const API_VERSION: &str = "2022-11-28";
