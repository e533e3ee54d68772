//! The `sync-bills` subcommand: ingest sponsored bills.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use hillsync_lib::sync::BillSync;
use hillsync_lib::{Db, RateGate};

#[derive(Args)]
pub struct SyncBillsArgs {
    /// SQLite database path
    #[arg(long, default_value = "hillsync.db")]
    pub db: PathBuf,

    /// Sponsored-legislation pool size per legislator; -1 asks the provider
    #[arg(long, default_value = "-1")]
    pub pool: i64,

    /// Bills kept per legislator after filtering, newest first
    #[arg(long, default_value = "50")]
    pub max_bills: usize,
}

pub async fn run(args: &SyncBillsArgs) -> Result<()> {
    let mut db = Db::open(&args.db)?;
    db.init()?;

    let client = super::congress_client()?;
    let gate = RateGate::congress();
    let sync = BillSync::new(&client, &gate);

    eprintln!("Syncing sponsored bills into {}", args.db.display());
    let summary = sync
        .sync_sponsored_bills(&mut db, args.pool, args.max_bills)
        .await?;

    eprintln!(
        "Bill sync complete: {} legislators processed ({} skipped), {} bills, {} sponsors, {} subjects, {} bills failed",
        summary.legislators_processed,
        summary.legislators_skipped,
        summary.bills_created,
        summary.sponsors_created,
        summary.subjects_created,
        summary.bills_failed
    );
    super::print_tracker("congress.gov", &gate.tracker().summary());
    Ok(())
}
