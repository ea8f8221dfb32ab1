//! Shared data model for gcp-audit: findings, the audit report, the
//! check table and environment-driven configuration.

pub mod check;
pub mod config;
pub mod error;
pub mod finding;
pub mod report;

pub use check::*;
pub use config::Config;
pub use error::*;
pub use finding::*;
pub use report::*;
