//! The `sync-donors` subcommand: ingest top contributions per campaign.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use hillsync_lib::sync::DonorSync;
use hillsync_lib::{Db, RateGate};

#[derive(Args)]
pub struct SyncDonorsArgs {
    /// SQLite database path
    #[arg(long, default_value = "hillsync.db")]
    pub db: PathBuf,

    /// Contributions requested per committee page
    #[arg(long, default_value = "100")]
    pub per_committee: i32,

    /// Donor rows kept per campaign after merging committees
    #[arg(long, default_value = "50")]
    pub per_campaign: usize,
}

pub async fn run(args: &SyncDonorsArgs) -> Result<()> {
    let mut db = Db::open(&args.db)?;
    db.init()?;

    let client = super::openfec_client()?;
    let gate = RateGate::finance();
    let sync = DonorSync::new(&client, &gate);

    eprintln!("Syncing donors into {}", args.db.display());
    let summary = sync
        .sync_donors(&mut db, args.per_committee, args.per_campaign)
        .await?;

    eprintln!(
        "Donor sync complete: {} campaigns processed ({} skipped, {} failed), {} donors, {} committees failed",
        summary.campaigns_processed,
        summary.campaigns_skipped,
        summary.campaigns_failed,
        summary.donors_created,
        summary.committees_failed
    );
    super::print_tracker("openfec", &gate.tracker().summary());
    Ok(())
}
