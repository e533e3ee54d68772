//! Legislator roster ingestion and lazy per-id resolution.

use std::collections::HashSet;

use congress_api::types::MemberDetail;
use congress_api::MemberListQuery;

use super::PAGE_LIMIT;
use crate::db::{Db, LegislatorRecord};
use crate::error::SyncError;
use crate::throttle::{with_retry, RateGate};

/// Fetches and upserts legislator records.
pub struct LegislatorSync<'a> {
    congress: &'a congress_api::Client,
    gate: &'a RateGate,
}

/// Outcome of a roster sync.
#[derive(Debug, Clone, Default)]
pub struct RosterSummary {
    pub total_listed: i64,
    pub created: usize,
    pub skipped: usize,
}

impl<'a> LegislatorSync<'a> {
    pub fn new(congress: &'a congress_api::Client, gate: &'a RateGate) -> Self {
        Self { congress, gate }
    }

    /// Page through the roster for `congress_number` and insert every member
    /// not yet stored. `total = -1` resolves the member count via a one-item
    /// probe first.
    ///
    /// Members whose detail fetch exhausts its retries are logged and
    /// skipped; a failed roster page aborts the run.
    pub async fn sync_roster(
        &self,
        db: &mut Db,
        congress_number: u32,
        total: i64,
    ) -> Result<RosterSummary, SyncError> {
        let total = if total < 0 {
            self.probe_total(congress_number).await?
        } else {
            total
        };
        tracing::info!("roster sync for congress {}: {} members", congress_number, total);

        let mut summary = RosterSummary {
            total_listed: total,
            ..Default::default()
        };
        // Guards against the same id appearing on two pages within one run.
        let mut seen_ids: HashSet<String> = HashSet::new();

        let mut offset = 0;
        while offset < total {
            let limit = PAGE_LIMIT.min(total - offset);
            let query = MemberListQuery::default()
                .with_congress(congress_number)
                .with_offset(offset)
                .with_limit(limit);
            let page = with_retry(self.gate, "congress.gov /member", || {
                self.congress.list_members(&query)
            })
            .await?;

            let mut batch = Vec::new();
            for member in &page.members {
                if !seen_ids.insert(member.bioguide_id.clone()) {
                    continue;
                }
                if db.legislator_exists(&member.bioguide_id)? {
                    summary.skipped += 1;
                    continue;
                }

                let context = format!("congress.gov /member/{}", member.bioguide_id);
                let detail = match with_retry(self.gate, &context, || {
                    self.congress.get_member(&member.bioguide_id)
                })
                .await
                {
                    Ok(response) => response.member,
                    Err(e) if e.is_item_scoped() => {
                        tracing::warn!("skipping member {}: {}", member.bioguide_id, e);
                        continue;
                    }
                    Err(e) => return Err(e),
                };

                // First and last name are mandatory; anything else defaults.
                if detail.first_name.is_none() || detail.last_name.is_none() {
                    tracing::debug!("member {} has no usable name, skipping", detail.bioguide_id);
                    continue;
                }
                batch.push(build_record(&detail));
            }

            let created = db.insert_legislators(&batch)?;
            summary.created += created;
            tracing::info!(
                "roster page at offset {}: {} inserted, {} listed",
                offset,
                created,
                page.members.len()
            );
            offset += limit;
        }

        Ok(summary)
    }

    /// Look up a legislator by bioguide id, fetching and creating it when
    /// absent. Safe to call repeatedly with the same id.
    pub async fn resolve_or_create(
        &self,
        db: &mut Db,
        bioguide_id: &str,
    ) -> Result<LegislatorRecord, SyncError> {
        if let Some(existing) = db.get_legislator(bioguide_id)? {
            return Ok(existing);
        }

        let context = format!("congress.gov /member/{}", bioguide_id);
        let response = with_retry(self.gate, &context, || {
            self.congress.get_member(bioguide_id)
        })
        .await?;

        let record = build_record(&response.member);
        db.insert_legislators(&[record.clone()])?;
        tracing::info!("created legislator {} ({})", record.full_name, record.bioguide_id);
        Ok(record)
    }

    async fn probe_total(&self, congress_number: u32) -> Result<i64, SyncError> {
        let query = MemberListQuery::default()
            .with_congress(congress_number)
            .with_limit(1);
        let response = with_retry(self.gate, "congress.gov /member (probe)", || {
            self.congress.list_members(&query)
        })
        .await?;
        Ok(response.pagination.map(|p| p.count).unwrap_or(0))
    }
}

/// Map a member detail record to storage form. Party and chamber come from
/// the most recent history entry and term respectively.
fn build_record(detail: &MemberDetail) -> LegislatorRecord {
    LegislatorRecord {
        bioguide_id: detail.bioguide_id.clone(),
        first_name: detail.first_name.clone().unwrap_or_default(),
        last_name: detail.last_name.clone().unwrap_or_default(),
        full_name: detail.direct_order_name.clone().unwrap_or_default(),
        birth_year: detail.birth_year_or(-1),
        current_party: detail.latest_party().unwrap_or_default().to_string(),
        state: detail.state.clone().unwrap_or_default(),
        district: detail.district.unwrap_or(-1),
        current_chamber: detail.latest_chamber().unwrap_or_default().to_string(),
        current_member: detail.current_member.unwrap_or(false),
        image_url: detail.depiction.as_ref().and_then(|d| d.image_url.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_record_defaults() {
        let detail: MemberDetail =
            serde_json::from_value(serde_json::json!({ "bioguideId": "X000001" })).unwrap();
        let record = build_record(&detail);
        assert_eq!(record.bioguide_id, "X000001");
        assert_eq!(record.birth_year, -1);
        assert_eq!(record.district, -1);
        assert_eq!(record.current_party, "");
        assert_eq!(record.current_chamber, "");
        assert!(!record.current_member);
    }

    #[test]
    fn build_record_picks_latest_term_and_party() {
        let detail: MemberDetail = serde_json::from_value(serde_json::json!({
            "bioguideId": "S000033",
            "firstName": "Bernard",
            "lastName": "Sanders",
            "directOrderName": "Bernard Sanders",
            "birthYear": "1941",
            "currentMember": true,
            "state": "Vermont",
            "partyHistory": [
                { "partyName": "Independent", "startYear": 2007 }
            ],
            "terms": [
                { "chamber": "House of Representatives", "startYear": 1991 },
                { "chamber": "Senate", "startYear": 2007 }
            ]
        }))
        .unwrap();
        let record = build_record(&detail);
        assert_eq!(record.current_chamber, "Senate");
        assert_eq!(record.current_party, "Independent");
        assert_eq!(record.birth_year, 1941);
    }
}
