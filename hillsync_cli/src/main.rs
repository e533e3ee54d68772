mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hillsync")]
#[command(about = "Ingest congressional and campaign-finance data into SQLite")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync the legislator roster for a congress
    SyncLegislators(commands::sync_legislators::SyncLegislatorsArgs),
    /// Sync sponsored bills for stored legislators
    SyncBills(commands::sync_bills::SyncBillsArgs),
    /// Sync FEC campaigns for stored legislators
    SyncCampaigns(commands::sync_campaigns::SyncCampaignsArgs),
    /// Sync top donors for stored campaigns
    SyncDonors(commands::sync_donors::SyncDonorsArgs),
    /// Run all four pipelines in dependency order
    SyncAll(commands::sync_all::SyncAllArgs),
    /// Show row counts per table
    Stats(commands::stats::StatsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hillsync=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::SyncLegislators(args) => commands::sync_legislators::run(args).await?,
        Commands::SyncBills(args) => commands::sync_bills::run(args).await?,
        Commands::SyncCampaigns(args) => commands::sync_campaigns::run(args).await?,
        Commands::SyncDonors(args) => commands::sync_donors::run(args).await?,
        Commands::SyncAll(args) => commands::sync_all::run(args).await?,
        Commands::Stats(args) => commands::stats::run(args)?,
    }

    Ok(())
}
