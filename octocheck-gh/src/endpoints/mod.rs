//! # GitHub API Endpoints
//!
//! Resource clients for the Checks API, one per resource family.

pub mod check_runs;
pub mod check_suites;

#[cfg(test)]
mod tests;
