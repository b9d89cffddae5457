//! Test utilities shared across the octocheck workspace
//!
//! This crate provides common testing infrastructure including:
//! - XDG directory and environment variable isolation ([`EnvTestGuard`],
//!   [`EnvVarGuard`])
//! - Temporary `.netrc` files ([`NetrcGuard`])
//! - JSON payloads shaped like GitHub Checks API responses ([`fixtures`])
//! - `Link` header construction for pagination tests ([`links`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod env;
pub mod fixtures;
pub mod links;
pub mod netrc;

// Re-export commonly used items
pub use env::{EnvTestGuard, EnvVarGuard, env_lock};
pub use netrc::NetrcGuard;
