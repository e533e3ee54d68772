//! The `sync-all` subcommand: run the four pipelines in dependency order.
//!
//! Bills and campaigns reference legislator rows and donors reference
//! campaign rows, so the order is fixed: legislators, bills, campaigns,
//! donors.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use hillsync_lib::sync::{BillSync, CampaignSync, DonorSync, LegislatorSync};
use hillsync_lib::{Db, RateGate};

#[derive(Args)]
pub struct SyncAllArgs {
    /// SQLite database path
    #[arg(long, default_value = "hillsync.db")]
    pub db: PathBuf,

    /// Congress number to sync (e.g. 119)
    #[arg(long, default_value = "119")]
    pub congress: u32,

    /// Bills kept per legislator after filtering, newest first
    #[arg(long, default_value = "50")]
    pub max_bills: usize,

    /// Contributions requested per committee page
    #[arg(long, default_value = "100")]
    pub per_committee: i32,

    /// Donor rows kept per campaign after merging committees
    #[arg(long, default_value = "50")]
    pub per_campaign: usize,
}

fn phase_spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

pub async fn run(args: &SyncAllArgs) -> Result<()> {
    let mut db = Db::open(&args.db)?;
    db.init()?;

    let congress = super::congress_client()?;
    let openfec = super::openfec_client()?;
    let congress_gate = RateGate::congress();
    let finance_gate = RateGate::finance();

    let spinner = phase_spinner("syncing legislators");
    let roster = LegislatorSync::new(&congress, &congress_gate)
        .sync_roster(&mut db, args.congress, -1)
        .await?;
    spinner.finish_with_message(format!(
        "legislators: {} created, {} already stored",
        roster.created, roster.skipped
    ));

    let spinner = phase_spinner("syncing bills");
    let bills = BillSync::new(&congress, &congress_gate)
        .sync_sponsored_bills(&mut db, -1, args.max_bills)
        .await?;
    spinner.finish_with_message(format!(
        "bills: {} created, {} sponsors, {} subjects",
        bills.bills_created, bills.sponsors_created, bills.subjects_created
    ));

    let spinner = phase_spinner("syncing campaigns");
    let campaigns = CampaignSync::new(&openfec, &finance_gate)
        .sync_campaigns(&mut db)
        .await?;
    spinner.finish_with_message(format!("campaigns: {} created", campaigns.campaigns_created));

    let spinner = phase_spinner("syncing donors");
    let donors = DonorSync::new(&openfec, &finance_gate)
        .sync_donors(&mut db, args.per_committee, args.per_campaign)
        .await?;
    spinner.finish_with_message(format!("donors: {} created", donors.donors_created));

    super::print_tracker("congress.gov", &congress_gate.tracker().summary());
    super::print_tracker("openfec", &finance_gate.tracker().summary());
    Ok(())
}
