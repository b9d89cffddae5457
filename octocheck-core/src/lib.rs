//! # Octocheck Core Library
//!
//! Shared building blocks for the octocheck crates: configuration directories,
//! the API configuration file, and credential discovery from `.netrc`.

pub mod config;
pub mod consts;
pub mod creds;

pub use config::{ApiConfig, ConfigDirs, get_config_dirs};
pub use creds::Credentials;
