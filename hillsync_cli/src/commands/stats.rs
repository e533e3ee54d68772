//! The `stats` subcommand: row counts per table.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use hillsync_lib::Db;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Args)]
pub struct StatsArgs {
    /// SQLite database path
    #[arg(long, default_value = "hillsync.db")]
    pub db: PathBuf,
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Table")]
    table: &'static str,
    #[tabled(rename = "Rows")]
    rows: i64,
}

pub fn run(args: &StatsArgs) -> Result<()> {
    let db = Db::open(&args.db)?;
    db.init()?;

    let rows: Vec<CountRow> = db
        .table_counts()?
        .into_iter()
        .map(|(table, rows)| CountRow { table, rows })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
    Ok(())
}
