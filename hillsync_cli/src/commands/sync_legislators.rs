//! The `sync-legislators` subcommand: ingest the member roster.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use hillsync_lib::sync::LegislatorSync;
use hillsync_lib::{Db, RateGate};

#[derive(Args)]
pub struct SyncLegislatorsArgs {
    /// SQLite database path
    #[arg(long, default_value = "hillsync.db")]
    pub db: PathBuf,

    /// Congress number to sync (e.g. 119)
    #[arg(long, default_value = "119")]
    pub congress: u32,

    /// Expected member count; -1 asks the provider
    #[arg(long, default_value = "-1")]
    pub total: i64,
}

pub async fn run(args: &SyncLegislatorsArgs) -> Result<()> {
    let mut db = Db::open(&args.db)?;
    db.init()?;

    let client = super::congress_client()?;
    let gate = RateGate::congress();
    let sync = LegislatorSync::new(&client, &gate);

    eprintln!(
        "Syncing legislators for congress {} into {}",
        args.congress,
        args.db.display()
    );
    let summary = sync.sync_roster(&mut db, args.congress, args.total).await?;

    eprintln!(
        "Roster sync complete: {} listed, {} created, {} already stored",
        summary.total_listed, summary.created, summary.skipped
    );
    super::print_tracker("congress.gov", &gate.tracker().summary());
    Ok(())
}
