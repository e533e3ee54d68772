//! CLI subcommand implementations.

pub mod stats;
pub mod sync_all;
pub mod sync_bills;
pub mod sync_campaigns;
pub mod sync_donors;
pub mod sync_legislators;

use anyhow::{Context, Result};
use hillsync_lib::{OpenFecClient, TrackerSummary};

/// Build a congress.gov client from the `CONGRESS_API_KEY` environment
/// variable.
pub fn congress_client() -> Result<hillsync_lib::congress_api::Client> {
    let key = std::env::var("CONGRESS_API_KEY")
        .context("CONGRESS_API_KEY is not set (get a key at api.congress.gov)")?;
    hillsync_lib::congress_api::Client::new(key).context("failed to build congress.gov client")
}

/// Build an OpenFEC client from the `OPENFEC_API_KEY` environment variable.
pub fn openfec_client() -> Result<OpenFecClient> {
    let key = std::env::var("OPENFEC_API_KEY")
        .context("OPENFEC_API_KEY is not set (get a key at api.open.fec.gov)")?;
    OpenFecClient::new(key).context("failed to build OpenFEC client")
}

/// Print request-tracker counters for a finished pipeline.
pub fn print_tracker(label: &str, summary: &TrackerSummary) {
    eprintln!(
        "{}: {} requests ({} ok, {} retried, {} failed), {:.1}s in backoff",
        label,
        summary.calls_made,
        summary.calls_succeeded,
        summary.calls_retried,
        summary.calls_failed,
        summary.total_backoff_secs
    );
}
