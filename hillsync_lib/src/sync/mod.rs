//! Reconciliation pipelines: fetch, filter, dedupe, persist.
//!
//! The four pipelines run in dependency order (legislators, bills,
//! campaigns, donors) because bills and campaigns reference legislator
//! rows and donors reference campaign rows. Each pipeline is idempotent:
//! re-running against unchanged upstream data inserts nothing.

pub mod bills;
pub mod campaigns;
pub mod donors;
pub mod legislators;

pub use bills::{BillSync, BillSyncSummary};
pub use campaigns::{CampaignSync, CampaignSyncSummary};
pub use donors::{DonorSync, DonorSyncSummary};
pub use legislators::{LegislatorSync, RosterSummary};

/// Page size cap for congress.gov list endpoints.
pub(crate) const PAGE_LIMIT: i64 = 250;
