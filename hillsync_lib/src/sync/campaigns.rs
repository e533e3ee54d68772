//! Campaign ingestion: match stored legislators to FEC candidates and
//! persist one campaign row per election year with financial totals.

use std::collections::HashMap;

use crate::db::{Db, NewCampaign};
use crate::error::SyncError;
use crate::openfec::types::{Candidate, CandidateSearchQuery, CandidateTotals};
use crate::openfec::OpenFecClient;
use crate::throttle::{with_retry, RateGate};

/// Sentinel persisted when the provider omits a financial amount.
const UNKNOWN_AMOUNT: f64 = -1.0;

/// How many search hits to consider per legislator name.
const SEARCH_PER_PAGE: i32 = 20;

/// Outcome of a campaign sync run.
#[derive(Debug, Clone, Default)]
pub struct CampaignSyncSummary {
    pub legislators_processed: usize,
    pub legislators_skipped: usize,
    pub candidates_matched: usize,
    pub campaigns_created: usize,
    pub searches_failed: usize,
}

/// Matches legislators to FEC candidate records and stores their campaigns.
pub struct CampaignSync<'a> {
    openfec: &'a OpenFecClient,
    gate: &'a RateGate,
}

impl<'a> CampaignSync<'a> {
    pub fn new(openfec: &'a OpenFecClient, gate: &'a RateGate) -> Self {
        Self { openfec, gate }
    }

    /// Sync campaigns for every stored legislator that has none yet.
    ///
    /// Name search is the only join key available between the two
    /// providers, so all hits for the legislator's full name are taken;
    /// a wrong-person hit creates campaigns that simply belong to a
    /// different fec_id and never collide with the right ones.
    pub async fn sync_campaigns(&self, db: &mut Db) -> Result<CampaignSyncSummary, SyncError> {
        let mut summary = CampaignSyncSummary::default();
        let roster = db.all_legislators()?;
        tracing::info!("campaign sync starting for {} legislators", roster.len());

        for legislator in roster {
            if db.legislator_has_campaign(&legislator.bioguide_id)? {
                tracing::debug!("skipping {}: already has campaigns", legislator.full_name);
                summary.legislators_skipped += 1;
                continue;
            }

            let context = format!("openfec /candidates/search ({})", legislator.full_name);
            let query = CandidateSearchQuery::default()
                .with_name(&legislator.full_name)
                .with_per_page(SEARCH_PER_PAGE);
            let candidates = match with_retry(self.gate, &context, || {
                self.openfec.search_candidates(&query)
            })
            .await
            {
                Ok(response) => response.results,
                Err(e) if e.is_item_scoped() => {
                    tracing::warn!("search failed for {}: {}", legislator.full_name, e);
                    summary.searches_failed += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let mut batch: Vec<NewCampaign> = Vec::new();
            for candidate in candidates {
                match self
                    .campaigns_for_candidate(db, &legislator.bioguide_id, &candidate)
                    .await
                {
                    Ok(campaigns) => {
                        if !campaigns.is_empty() {
                            summary.candidates_matched += 1;
                        }
                        batch.extend(campaigns);
                    }
                    Err(e) if e.is_item_scoped() => {
                        tracing::warn!(
                            "totals fetch failed for candidate {:?}: {}",
                            candidate.candidate_id,
                            e
                        );
                        summary.searches_failed += 1;
                    }
                    Err(e) => return Err(e),
                }
            }

            summary.campaigns_created += db.insert_campaigns(&batch)?;
            summary.legislators_processed += 1;
        }

        Ok(summary)
    }

    /// Build campaign rows for one candidate: one per election year, with
    /// totals where the provider reports them for that year.
    async fn campaigns_for_candidate(
        &self,
        db: &Db,
        bioguide_id: &str,
        candidate: &Candidate,
    ) -> Result<Vec<NewCampaign>, SyncError> {
        // Entries without an id cannot be joined to totals or donors.
        let Some(candidate_id) = candidate.candidate_id.as_deref() else {
            return Ok(Vec::new());
        };

        let context = format!("openfec /candidate/{}/totals", candidate_id);
        let totals = with_retry(self.gate, &context, || {
            self.openfec.get_candidate_totals(candidate_id)
        })
        .await?
        .results;
        let totals_by_year = index_totals_by_year(&totals);

        let mut campaigns = Vec::new();
        for &year in &candidate.election_years {
            if db.campaign_exists(candidate_id, year as i64)? {
                continue;
            }
            campaigns.push(build_campaign(
                candidate_id,
                bioguide_id,
                candidate.office_full.as_deref().unwrap_or_default(),
                year,
                totals_by_year.get(&year).copied(),
            ));
        }
        Ok(campaigns)
    }
}

/// Index totals by election year. Entries without a year are unusable.
fn index_totals_by_year(totals: &[CandidateTotals]) -> HashMap<i32, &CandidateTotals> {
    totals
        .iter()
        .filter_map(|t| t.candidate_election_year.map(|y| (y, t)))
        .collect()
}

fn build_campaign(
    fec_id: &str,
    bioguide_id: &str,
    office_full: &str,
    election_year: i32,
    totals: Option<&CandidateTotals>,
) -> NewCampaign {
    let amount = |f: fn(&CandidateTotals) -> Option<f64>| {
        totals.and_then(f).unwrap_or(UNKNOWN_AMOUNT)
    };
    NewCampaign {
        fec_id: fec_id.to_string(),
        bioguide_id: bioguide_id.to_string(),
        election_year: election_year as i64,
        office_full: office_full.to_string(),
        other_committee_contributions: amount(|t| t.other_political_committee_contributions),
        individual_itemized_contributions: amount(|t| t.individual_itemized_contributions),
        individual_unitemized_contributions: amount(|t| t.individual_unitemized_contributions),
        disbursements: amount(|t| t.disbursements),
        contributions: amount(|t| t.contributions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(year: i32, contributions: Option<f64>) -> CandidateTotals {
        serde_json::from_value(serde_json::json!({
            "candidate_election_year": year,
            "contributions": contributions,
        }))
        .unwrap()
    }

    #[test]
    fn totals_indexed_by_year_drops_yearless_entries() {
        let yearless: CandidateTotals =
            serde_json::from_value(serde_json::json!({ "contributions": 10.0 })).unwrap();
        let rows = vec![totals(2020, Some(100.0)), yearless, totals(2024, None)];
        let index = index_totals_by_year(&rows);
        assert_eq!(index.len(), 2);
        assert!(index.contains_key(&2020));
        assert!(index.contains_key(&2024));
    }

    #[test]
    fn campaign_without_totals_uses_sentinels() {
        let campaign = build_campaign("S4VT00033", "S000033", "Senate", 2018, None);
        assert_eq!(campaign.election_year, 2018);
        assert_eq!(campaign.contributions, UNKNOWN_AMOUNT);
        assert_eq!(campaign.disbursements, UNKNOWN_AMOUNT);
        assert_eq!(campaign.individual_itemized_contributions, UNKNOWN_AMOUNT);
    }

    #[test]
    fn campaign_with_partial_totals_fills_known_amounts() {
        let t = totals(2024, Some(1_500_000.5));
        let campaign = build_campaign("S4VT00033", "S000033", "Senate", 2024, Some(&t));
        assert_eq!(campaign.contributions, 1_500_000.5);
        // Amounts the provider omitted stay at the sentinel
        assert_eq!(campaign.disbursements, UNKNOWN_AMOUNT);
    }
}
