//! Library layer for hillsync: rate-limited ingestion of legislative and
//! campaign-finance data into SQLite.
//!
//! Wraps the `congress_api` crate and a local OpenFEC client behind a shared
//! throttling/retry layer, and provides the four reconciliation pipelines
//! (legislators, bills, campaigns, donors) that the CLI orchestrates.

pub mod db;
pub mod error;
pub mod openfec;
pub mod sync;
pub mod throttle;

pub use congress_api;

pub use db::{Db, DbError};
pub use error::SyncError;
pub use openfec::{OpenFecClient, OpenFecError};
pub use throttle::{with_retry, RateGate, RequestTracker, TrackerSummary};
