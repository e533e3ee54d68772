//! The `sync-campaigns` subcommand: match legislators to FEC candidates.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use hillsync_lib::sync::CampaignSync;
use hillsync_lib::{Db, RateGate};

#[derive(Args)]
pub struct SyncCampaignsArgs {
    /// SQLite database path
    #[arg(long, default_value = "hillsync.db")]
    pub db: PathBuf,
}

pub async fn run(args: &SyncCampaignsArgs) -> Result<()> {
    let mut db = Db::open(&args.db)?;
    db.init()?;

    let client = super::openfec_client()?;
    let gate = RateGate::finance();
    let sync = CampaignSync::new(&client, &gate);

    eprintln!("Syncing campaigns into {}", args.db.display());
    let summary = sync.sync_campaigns(&mut db).await?;

    eprintln!(
        "Campaign sync complete: {} legislators processed ({} skipped), {} candidates matched, {} campaigns, {} lookups failed",
        summary.legislators_processed,
        summary.legislators_skipped,
        summary.candidates_matched,
        summary.campaigns_created,
        summary.searches_failed
    );
    super::print_tracker("openfec", &gate.tracker().summary());
    Ok(())
}
