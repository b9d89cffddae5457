//! Data types mirroring the GitHub Checks API request and response shapes.

mod checks;
mod common;
mod options;
mod suites;
pub mod wire;

pub use checks::*;
pub use common::*;
pub use options::*;
pub use suites::*;
pub use wire::WireValue;
