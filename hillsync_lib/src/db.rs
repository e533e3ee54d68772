//! SQLite storage for ingested legislative and campaign-finance data.
//!
//! Dedup policy: every bulk insert runs `INSERT OR IGNORE` inside one
//! transaction, so the schema's unique constraints are the source of truth
//! and a duplicate key is a silent no-op. Re-running any pipeline against
//! unchanged upstream data leaves the tables unchanged.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// A stored legislator, keyed by bioguide id.
#[derive(Debug, Clone)]
pub struct LegislatorRecord {
    pub bioguide_id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub birth_year: i64,
    pub current_party: String,
    pub state: String,
    pub district: i64,
    pub current_chamber: String,
    pub current_member: bool,
    pub image_url: Option<String>,
}

/// Composite natural key of a bill.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BillKey {
    pub congress: i64,
    pub bill_type: String,
    pub number: String,
}

/// A bill ready for insertion.
#[derive(Debug, Clone)]
pub struct NewBill {
    pub key: BillKey,
    pub title: String,
    pub introduction_date: String,
    pub update_date: Option<String>,
    pub short_summary: String,
    pub ethics_score: f64,
}

/// Sponsorship role on a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SponsorType {
    Unknown,
    Sponsor,
    Cosponsor,
}

impl SponsorType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Sponsor => "sponsor",
            Self::Cosponsor => "cosponsor",
        }
    }
}

/// A bill-sponsor link ready for insertion.
#[derive(Debug, Clone)]
pub struct NewBillSponsor {
    pub bill_id: i64,
    pub bioguide_id: String,
    pub sponsor_type: SponsorType,
}

/// A campaign ready for insertion. Financial aggregates use -1 as the
/// "unknown / not returned by provider" sentinel.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub fec_id: String,
    pub bioguide_id: String,
    pub election_year: i64,
    pub office_full: String,
    pub other_committee_contributions: f64,
    pub individual_itemized_contributions: f64,
    pub individual_unitemized_contributions: f64,
    pub disbursements: f64,
    pub contributions: f64,
}

/// A stored campaign as seen by the donor pipeline.
#[derive(Debug, Clone)]
pub struct CampaignRow {
    pub campaign_id: i64,
    pub fec_id: String,
    pub bioguide_id: String,
    pub election_year: i64,
}

/// A donor record ready for insertion.
#[derive(Debug, Clone)]
pub struct NewDonor {
    pub campaign_id: i64,
    pub source_name: String,
    pub recipient_name: String,
    pub entity_type: String,
    pub contribution_receipt_amount: f64,
    pub contribution_receipt_date: String,
}

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Apply the schema. Idempotent.
    pub fn init(&self) -> Result<(), DbError> {
        let schema = include_str!("../../schema/sqlite.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Legislators
    // ------------------------------------------------------------------

    pub fn legislator_exists(&self, bioguide_id: &str) -> Result<bool, DbError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM legislators WHERE bioguide_id = ?1)",
            [bioguide_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn get_legislator(&self, bioguide_id: &str) -> Result<Option<LegislatorRecord>, DbError> {
        self.conn
            .query_row(
                "SELECT bioguide_id, first_name, last_name, full_name, birth_year,
                        current_party, state, district, current_chamber, current_member,
                        image_url
                 FROM legislators WHERE bioguide_id = ?1",
                [bioguide_id],
                row_to_legislator,
            )
            .optional()
            .map_err(DbError::from)
    }

    pub fn all_legislators(&self) -> Result<Vec<LegislatorRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT bioguide_id, first_name, last_name, full_name, birth_year,
                    current_party, state, district, current_chamber, current_member,
                    image_url
             FROM legislators ORDER BY bioguide_id",
        )?;
        let rows = stmt
            .query_map([], row_to_legislator)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Bulk-insert legislators; duplicates by bioguide id are skipped.
    /// Returns the number of rows actually inserted.
    pub fn insert_legislators(&mut self, records: &[LegislatorRecord]) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO legislators (
                    bioguide_id, first_name, last_name, full_name, birth_year,
                    current_party, state, district, current_chamber, current_member,
                    image_url
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for record in records {
                inserted += stmt.execute(params![
                    record.bioguide_id,
                    record.first_name,
                    record.last_name,
                    record.full_name,
                    record.birth_year,
                    record.current_party,
                    record.state,
                    record.district,
                    record.current_chamber,
                    record.current_member,
                    record.image_url,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    // ------------------------------------------------------------------
    // Bills
    // ------------------------------------------------------------------

    pub fn bill_exists(&self, key: &BillKey) -> Result<bool, DbError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM bills WHERE congress = ?1 AND bill_type = ?2 AND number = ?3
             )",
            params![key.congress, key.bill_type, key.number],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn get_bill_id(&self, key: &BillKey) -> Result<Option<i64>, DbError> {
        self.conn
            .query_row(
                "SELECT bill_id FROM bills WHERE congress = ?1 AND bill_type = ?2 AND number = ?3",
                params![key.congress, key.bill_type, key.number],
                |row| row.get(0),
            )
            .optional()
            .map_err(DbError::from)
    }

    pub fn insert_bills(&mut self, bills: &[NewBill]) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO bills (
                    congress, bill_type, number, title, introduction_date,
                    update_date, short_summary, ethics_score
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for bill in bills {
                inserted += stmt.execute(params![
                    bill.key.congress,
                    bill.key.bill_type,
                    bill.key.number,
                    bill.title,
                    bill.introduction_date,
                    bill.update_date,
                    bill.short_summary,
                    bill.ethics_score,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Whether any sponsorship rows exist for the legislator. Used as the
    /// once-only gate in the bill pipeline.
    pub fn legislator_has_sponsored(&self, bioguide_id: &str) -> Result<bool, DbError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM bill_sponsors WHERE bioguide_id = ?1)",
            [bioguide_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn insert_bill_sponsors(&mut self, sponsors: &[NewBillSponsor]) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO bill_sponsors (bill_id, bioguide_id, sponsor_type)
                 VALUES (?1, ?2, ?3)",
            )?;
            for sponsor in sponsors {
                inserted += stmt.execute(params![
                    sponsor.bill_id,
                    sponsor.bioguide_id,
                    sponsor.sponsor_type.as_str(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    pub fn bill_subject_exists(&self, bill_id: i64, subject: &str) -> Result<bool, DbError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM bill_subjects WHERE bill_id = ?1 AND political_subject = ?2
             )",
            params![bill_id, subject],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn insert_bill_subjects(&mut self, subjects: &[(i64, String)]) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO bill_subjects (bill_id, political_subject)
                 VALUES (?1, ?2)",
            )?;
            for (bill_id, subject) in subjects {
                inserted += stmt.execute(params![bill_id, subject])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    // ------------------------------------------------------------------
    // Campaigns
    // ------------------------------------------------------------------

    /// Whether any campaigns exist for the legislator. Used as the
    /// once-only gate in the campaign pipeline.
    pub fn legislator_has_campaign(&self, bioguide_id: &str) -> Result<bool, DbError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM campaigns WHERE bioguide_id = ?1)",
            [bioguide_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn campaign_exists(&self, fec_id: &str, election_year: i64) -> Result<bool, DbError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM campaigns WHERE fec_id = ?1 AND election_year = ?2
             )",
            params![fec_id, election_year],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn insert_campaigns(&mut self, campaigns: &[NewCampaign]) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO campaigns (
                    fec_id, bioguide_id, election_year, office_full,
                    other_committee_contributions, individual_itemized_contributions,
                    individual_unitemized_contributions, disbursements, contributions
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for campaign in campaigns {
                inserted += stmt.execute(params![
                    campaign.fec_id,
                    campaign.bioguide_id,
                    campaign.election_year,
                    campaign.office_full,
                    campaign.other_committee_contributions,
                    campaign.individual_itemized_contributions,
                    campaign.individual_unitemized_contributions,
                    campaign.disbursements,
                    campaign.contributions,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    pub fn all_campaigns(&self) -> Result<Vec<CampaignRow>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT campaign_id, fec_id, bioguide_id, election_year
             FROM campaigns ORDER BY campaign_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CampaignRow {
                    campaign_id: row.get(0)?,
                    fec_id: row.get(1)?,
                    bioguide_id: row.get(2)?,
                    election_year: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ------------------------------------------------------------------
    // Donors
    // ------------------------------------------------------------------

    pub fn donor_exists(
        &self,
        campaign_id: i64,
        source_name: &str,
        recipient_name: &str,
        receipt_date: &str,
    ) -> Result<bool, DbError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM donors
                WHERE campaign_id = ?1 AND source_name = ?2
                  AND recipient_name = ?3 AND contribution_receipt_date = ?4
             )",
            params![campaign_id, source_name, recipient_name, receipt_date],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn insert_donors(&mut self, donors: &[NewDonor]) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO donors (
                    campaign_id, source_name, recipient_name, entity_type,
                    contribution_receipt_amount, contribution_receipt_date
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for donor in donors {
                inserted += stmt.execute(params![
                    donor.campaign_id,
                    donor.source_name,
                    donor.recipient_name,
                    donor.entity_type,
                    donor.contribution_receipt_amount,
                    donor.contribution_receipt_date,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    // ------------------------------------------------------------------
    // Stats
    // ------------------------------------------------------------------

    /// Row counts per table, for the CLI stats view.
    pub fn table_counts(&self) -> Result<Vec<(&'static str, i64)>, DbError> {
        const TABLES: [&str; 6] = [
            "legislators",
            "bills",
            "bill_subjects",
            "bill_sponsors",
            "campaigns",
            "donors",
        ];
        let mut counts = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            let count: i64 =
                self.conn
                    .query_row(&format!("SELECT COUNT(1) FROM {}", table), [], |row| {
                        row.get(0)
                    })?;
            counts.push((table, count));
        }
        Ok(counts)
    }
}

fn row_to_legislator(row: &rusqlite::Row<'_>) -> rusqlite::Result<LegislatorRecord> {
    Ok(LegislatorRecord {
        bioguide_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        full_name: row.get(3)?,
        birth_year: row.get(4)?,
        current_party: row.get(5)?,
        state: row.get(6)?,
        district: row.get(7)?,
        current_chamber: row.get(8)?,
        current_member: row.get(9)?,
        image_url: row.get(10)?,
    })
}
