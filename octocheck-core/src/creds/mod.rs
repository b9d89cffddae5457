//! # Credential Management
//!
//! Retrieval and storage of GitHub credentials. Credentials live in the
//! user's `.netrc` file so they can be shared with git and other tools.

pub mod netrc;

/// Represents credentials for a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}
