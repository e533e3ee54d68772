//! Donor ingestion: top itemized contributions per campaign, pulled from
//! the authorized committees of each matched candidate.

use std::collections::HashSet;

use chrono::Datelike;

use crate::db::{CampaignRow, Db, NewDonor};
use crate::error::SyncError;
use crate::openfec::types::{Contribution, ScheduleAQuery};
use crate::openfec::OpenFecClient;
use crate::throttle::{with_retry, RateGate};

/// Outcome of a donor sync run. `campaigns_failed` counts campaigns whose
/// committee listing could not be fetched; `committees_failed` counts
/// individual committees whose Schedule A page could not be fetched within
/// an otherwise processed campaign.
#[derive(Debug, Clone, Default)]
pub struct DonorSyncSummary {
    pub campaigns_processed: usize,
    pub campaigns_skipped: usize,
    pub campaigns_failed: usize,
    pub donors_created: usize,
    pub committees_failed: usize,
}

/// Fetches and persists top contributions for stored campaigns.
pub struct DonorSync<'a> {
    openfec: &'a OpenFecClient,
    gate: &'a RateGate,
}

impl<'a> DonorSync<'a> {
    pub fn new(openfec: &'a OpenFecClient, gate: &'a RateGate) -> Self {
        Self { openfec, gate }
    }

    /// Sync donors for every stored campaign whose cycle has concluded.
    ///
    /// One amount-sorted Schedule A page is fetched per committee, so each
    /// campaign costs `1 + committees` requests. `max_per_committee` bounds
    /// the page size and `max_per_campaign` the rows kept after merging.
    pub async fn sync_donors(
        &self,
        db: &mut Db,
        max_per_committee: i32,
        max_per_campaign: usize,
    ) -> Result<DonorSyncSummary, SyncError> {
        let mut summary = DonorSyncSummary::default();
        let campaigns = db.all_campaigns()?;
        let current_year = chrono::Utc::now().year() as i64;
        tracing::info!("donor sync starting for {} campaigns", campaigns.len());

        for campaign in campaigns {
            // Future cycles have no complete filings yet; retry next run.
            if campaign.election_year > current_year {
                tracing::debug!(
                    "skipping campaign {} ({}): cycle not concluded",
                    campaign.fec_id,
                    campaign.election_year
                );
                summary.campaigns_skipped += 1;
                continue;
            }

            match self
                .sync_one_campaign(db, &campaign, max_per_committee, max_per_campaign, &mut summary)
                .await
            {
                Ok(()) => summary.campaigns_processed += 1,
                Err(e) if e.is_item_scoped() => {
                    tracing::warn!(
                        "skipping campaign {} ({}): {}",
                        campaign.fec_id,
                        campaign.election_year,
                        e
                    );
                    summary.campaigns_failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    async fn sync_one_campaign(
        &self,
        db: &mut Db,
        campaign: &CampaignRow,
        max_per_committee: i32,
        max_per_campaign: usize,
        summary: &mut DonorSyncSummary,
    ) -> Result<(), SyncError> {
        let context = format!("openfec /candidate/{}/committees", campaign.fec_id);
        let committees = with_retry(self.gate, &context, || {
            self.openfec.get_candidate_committees(&campaign.fec_id)
        })
        .await?
        .results;

        // Dedup within the run: the same receipt can surface through more
        // than one committee page.
        let mut seen: HashSet<(String, String, String)> = HashSet::new();
        let mut collected: Vec<NewDonor> = Vec::new();

        for committee in committees {
            let Some(committee_id) = committee.committee_id.as_deref() else {
                continue;
            };
            let query = ScheduleAQuery::default()
                .with_committee_id(committee_id)
                .with_cycle(campaign.election_year as i32)
                .with_per_page(max_per_committee)
                .sorted_by_amount_desc();
            let context = format!("openfec /schedules/schedule_a ({})", committee_id);
            let contributions = match with_retry(self.gate, &context, || {
                self.openfec.get_schedule_a(&query)
            })
            .await
            {
                Ok(response) => response.results,
                Err(e) if e.is_item_scoped() => {
                    tracing::warn!("schedule A fetch failed for {}: {}", committee_id, e);
                    summary.committees_failed += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            for contribution in contributions {
                let Some(donor) = build_donor(campaign.campaign_id, &contribution) else {
                    continue;
                };
                let dedup_key = (
                    donor.source_name.clone(),
                    donor.recipient_name.clone(),
                    donor.contribution_receipt_date.clone(),
                );
                if !seen.insert(dedup_key) {
                    continue;
                }
                if db.donor_exists(
                    campaign.campaign_id,
                    &donor.source_name,
                    &donor.recipient_name,
                    &donor.contribution_receipt_date,
                )? {
                    continue;
                }
                collected.push(donor);
            }
        }

        let top = select_top_donors(collected, max_per_campaign);
        summary.donors_created += db.insert_donors(&top)?;
        Ok(())
    }
}

/// Map a contribution to storage form. Rows missing any of the identity
/// fields or the amount cannot be keyed and are dropped.
fn build_donor(campaign_id: i64, contribution: &Contribution) -> Option<NewDonor> {
    let source_name = contribution.contributor_name.clone()?;
    let recipient_name = contribution.committee.as_ref()?.name.clone()?;
    let contribution_receipt_date = contribution.contribution_receipt_date.clone()?;
    let contribution_receipt_amount = contribution.contribution_receipt_amount?;
    Some(NewDonor {
        campaign_id,
        source_name,
        recipient_name,
        entity_type: contribution.entity_type.clone().unwrap_or_default(),
        contribution_receipt_amount,
        contribution_receipt_date,
    })
}

/// Keep the `cap` largest contributions across all committees.
pub fn select_top_donors(mut donors: Vec<NewDonor>, cap: usize) -> Vec<NewDonor> {
    donors.sort_by(|a, b| {
        b.contribution_receipt_amount
            .partial_cmp(&a.contribution_receipt_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    donors.truncate(cap);
    donors
}
