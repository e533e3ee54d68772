//! Top-level error type returned by the sync pipelines.

use thiserror::Error;

use crate::db::DbError;
use crate::openfec::OpenFecError;

/// Errors produced by the sync pipelines.
///
/// `FetchExhausted` is the terminal form of a transient upstream failure:
/// the retry budget for one fetch is spent. It is fatal for the item being
/// processed; pipelines decide whether to skip the item or abort the run.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("fetch exhausted after {attempts} attempts: {context}")]
    FetchExhausted { context: String, attempts: u32 },
    #[error("congress.gov API error: {0}")]
    Congress(#[from] congress_api::Error),
    #[error("OpenFEC API error: {0}")]
    OpenFec(#[from] OpenFecError),
    #[error("database error: {0}")]
    Db(#[from] DbError),
}

impl SyncError {
    /// Whether this error should stop the item being processed without
    /// stopping the whole run.
    pub fn is_item_scoped(&self) -> bool {
        matches!(self, Self::FetchExhausted { .. })
    }
}
