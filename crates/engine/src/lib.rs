//! Resource acquisition and audit orchestration.
//!
//! - [`fetcher`]: the `ResourceFetcher` seam and an in-memory implementation
//! - [`registry`]: plugin name → fetcher, resolved against the check table
//! - [`cache`]: per-run namespace/key cache shared between fetchers
//! - [`snapshot`]: fetchers backed by on-disk API snapshots
//! - [`audit`]: projects × checks fan-out, rule evaluation, report assembly

pub mod audit;
pub mod cache;
pub mod error;
pub mod fetcher;
pub mod registry;
pub mod snapshot;

pub use audit::{AuditOutcome, AuditSummary, Auditor};
pub use cache::PluginCache;
pub use error::AcquisitionError;
pub use fetcher::{ResourceFetcher, StaticFetcher};
pub use registry::{FetcherRegistry, ResolvedCheck};
pub use snapshot::SnapshotStore;
