//! Sponsored-bill ingestion: fetch, filter, rank, detail, persist,
//! cross-reference.

use std::collections::HashSet;

use congress_api::types::{BillDetail, BillSummary};
use congress_api::PageQuery;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::{LegislatorSync, PAGE_LIMIT};
use crate::db::{BillKey, Db, NewBill, NewBillSponsor, SponsorType};
use crate::error::SyncError;
use crate::throttle::{with_retry, RateGate};

/// Placeholder titles the provider uses for unassigned bill numbers.
const PLACEHOLDER_TITLES: [&str; 2] = [
    "Reserved for the Speaker.",
    "Reserved for the Minority Leader.",
];

/// Score assigned to every bill until scoring is implemented.
const DEFAULT_ETHICS_SCORE: f64 = 1.0;

/// The six legislative vehicle types tracked. Amendments and resolutions
/// outside this set are dropped at the filter stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillType {
    Hr,
    S,
    HjRes,
    SjRes,
    HconRes,
    SconRes,
}

impl BillType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "HR" => Some(Self::Hr),
            "S" => Some(Self::S),
            "HJRES" => Some(Self::HjRes),
            "SJRES" => Some(Self::SjRes),
            "HCONRES" => Some(Self::HconRes),
            "SCONRES" => Some(Self::SconRes),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hr => "HR",
            Self::S => "S",
            Self::HjRes => "HJRES",
            Self::SjRes => "SJRES",
            Self::HconRes => "HCONRES",
            Self::SconRes => "SCONRES",
        }
    }
}

/// A bill that survived the filter stage, with the fields persist needs.
#[derive(Debug, Clone)]
pub struct CandidateBill {
    pub key: BillKey,
    pub title: String,
    pub introduction_date: String,
    pub update_date: Option<String>,
}

/// Outcome of a bill sync run.
#[derive(Debug, Clone, Default)]
pub struct BillSyncSummary {
    pub legislators_processed: usize,
    pub legislators_skipped: usize,
    pub bills_created: usize,
    pub sponsors_created: usize,
    pub subjects_created: usize,
    pub bills_failed: usize,
}

/// Per-bill detail gathered before persisting.
struct DetailBundle {
    subjects: Vec<String>,
    short_summary: String,
    sponsor_bioguides: Vec<String>,
}

/// Fetches, reconciles, and persists sponsored bills per legislator.
pub struct BillSync<'a> {
    congress: &'a congress_api::Client,
    gate: &'a RateGate,
    legislators: LegislatorSync<'a>,
}

impl<'a> BillSync<'a> {
    pub fn new(congress: &'a congress_api::Client, gate: &'a RateGate) -> Self {
        Self {
            congress,
            gate,
            legislators: LegislatorSync::new(congress, gate),
        }
    }

    /// Sync sponsored bills for every stored legislator that has none yet.
    ///
    /// A legislator with any existing bill_sponsors row is skipped outright:
    /// this is a coarse once-only gate, not an incremental per-bill sync.
    pub async fn sync_sponsored_bills(
        &self,
        db: &mut Db,
        per_legislator_pool: i64,
        max_relevant: usize,
    ) -> Result<BillSyncSummary, SyncError> {
        let mut summary = BillSyncSummary::default();
        let roster = db.all_legislators()?;
        tracing::info!("bill sync starting for {} legislators", roster.len());

        for legislator in roster {
            if db.legislator_has_sponsored(&legislator.bioguide_id)? {
                tracing::debug!("skipping {}: already has sponsored bills", legislator.full_name);
                summary.legislators_skipped += 1;
                continue;
            }
            self.sync_one_legislator(
                db,
                &legislator.bioguide_id,
                per_legislator_pool,
                max_relevant,
                &mut summary,
            )
            .await?;
            summary.legislators_processed += 1;
        }

        Ok(summary)
    }

    async fn sync_one_legislator(
        &self,
        db: &mut Db,
        bioguide_id: &str,
        per_legislator_pool: i64,
        max_relevant: usize,
        summary: &mut BillSyncSummary,
    ) -> Result<(), SyncError> {
        let pool = self.collect_pool(bioguide_id, per_legislator_pool).await?;

        let mut exclusion: HashSet<BillKey> = HashSet::new();
        let filtered = filter_bills(&pool, &mut exclusion);
        let kept = rank_and_truncate(filtered, max_relevant);
        tracing::info!(
            "{}: {} listed, {} kept after filter+rank",
            bioguide_id,
            pool.len(),
            kept.len()
        );

        // Detail stage. Time passes between here and the filter's exclusion
        // check, so storage is re-checked per bill; the unique constraint is
        // the final arbiter either way.
        let mut new_bills: Vec<NewBill> = Vec::new();
        let mut sponsor_refs: Vec<(BillKey, String)> = Vec::new();
        let mut subject_refs: Vec<(BillKey, Vec<String>)> = Vec::new();

        for bill in kept {
            if db.bill_exists(&bill.key)? {
                continue;
            }
            let bundle = match self.fetch_detail(&bill.key).await {
                Ok(bundle) => bundle,
                Err(e) if e.is_item_scoped() => {
                    tracing::warn!(
                        "skipping bill {}/{}/{}: {}",
                        bill.key.congress,
                        bill.key.bill_type,
                        bill.key.number,
                        e
                    );
                    summary.bills_failed += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            for bioguide in bundle.sponsor_bioguides {
                sponsor_refs.push((bill.key.clone(), bioguide));
            }
            if !bundle.subjects.is_empty() {
                subject_refs.push((bill.key.clone(), bundle.subjects));
            }
            new_bills.push(NewBill {
                key: bill.key,
                title: bill.title,
                introduction_date: bill.introduction_date,
                update_date: bill.update_date,
                short_summary: bundle.short_summary,
                ethics_score: DEFAULT_ETHICS_SCORE,
            });
        }

        summary.bills_created += db.insert_bills(&new_bills)?;

        // Cross-reference: re-read generated ids, then link sponsors,
        // lazily creating legislators first seen as co-sponsors here.
        let mut sponsors: Vec<NewBillSponsor> = Vec::new();
        for (key, bioguide) in sponsor_refs {
            let Some(bill_id) = db.get_bill_id(&key)? else {
                continue;
            };
            let legislator = match self.legislators.resolve_or_create(db, &bioguide).await {
                Ok(record) => record,
                Err(e) if e.is_item_scoped() => {
                    tracing::warn!("could not resolve sponsor {}: {}", bioguide, e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            sponsors.push(NewBillSponsor {
                bill_id,
                bioguide_id: legislator.bioguide_id,
                sponsor_type: SponsorType::Sponsor,
            });
        }
        summary.sponsors_created += db.insert_bill_sponsors(&sponsors)?;

        let mut subjects: Vec<(i64, String)> = Vec::new();
        for (key, names) in subject_refs {
            let Some(bill_id) = db.get_bill_id(&key)? else {
                continue;
            };
            for name in names {
                if !db.bill_subject_exists(bill_id, &name)? {
                    subjects.push((bill_id, name));
                }
            }
        }
        summary.subjects_created += db.insert_bill_subjects(&subjects)?;

        Ok(())
    }

    /// Accumulate up to `pool` sponsored-legislation summaries, paging 250
    /// at a time. `pool = -1` probes the provider for the full count.
    async fn collect_pool(
        &self,
        bioguide_id: &str,
        pool: i64,
    ) -> Result<Vec<BillSummary>, SyncError> {
        let context = format!("congress.gov /member/{}/sponsored-legislation", bioguide_id);

        let pool = if pool < 0 {
            let query = PageQuery::new(0, 1);
            let probe = with_retry(self.gate, &context, || {
                self.congress.sponsored_legislation(bioguide_id, &query)
            })
            .await?;
            probe.pagination.map(|p| p.count).unwrap_or(0)
        } else {
            pool
        };

        let mut bills = Vec::new();
        let mut offset = 0;
        while offset < pool {
            let limit = PAGE_LIMIT.min(pool - offset);
            let query = PageQuery::new(offset, limit);
            let page = with_retry(self.gate, &context, || {
                self.congress.sponsored_legislation(bioguide_id, &query)
            })
            .await?;
            let fetched = page.sponsored_legislation.len();
            bills.extend(page.sponsored_legislation);
            if fetched == 0 {
                break;
            }
            offset += limit;
        }
        Ok(bills)
    }

    async fn fetch_detail(&self, key: &BillKey) -> Result<DetailBundle, SyncError> {
        let context = format!(
            "congress.gov /bill/{}/{}/{}",
            key.congress, key.bill_type, key.number
        );
        let detail = with_retry(self.gate, &context, || {
            self.congress
                .get_bill(key.congress, &key.bill_type, &key.number)
        })
        .await?
        .bill;

        let subjects = self.fetch_subjects(&detail).await;
        let short_summary = self.fetch_short_summary(&detail).await;
        let sponsor_bioguides = detail
            .sponsors
            .iter()
            .filter_map(|s| s.bioguide_id.clone())
            .collect();

        Ok(DetailBundle {
            subjects,
            short_summary,
            sponsor_bioguides,
        })
    }

    /// Subjects are best-effort: any failure yields an empty list rather
    /// than failing the bill.
    async fn fetch_subjects(&self, detail: &BillDetail) -> Vec<String> {
        let Some(link) = detail.subjects.as_ref().filter(|l| l.count > 0) else {
            return Vec::new();
        };
        let Some(url) = link.url.as_deref() else {
            return Vec::new();
        };

        match with_retry(self.gate, url, || self.congress.get_subjects(url)).await {
            Ok(response) => response
                .subjects
                .map(|body| {
                    body.legislative_subjects
                        .into_iter()
                        .filter_map(|s| s.name)
                        .collect()
                })
                .unwrap_or_default(),
            Err(e) => {
                tracing::warn!("subjects fetch failed for {}: {}", url, e);
                Vec::new()
            }
        }
    }

    /// The short summary comes from the formatted XML of the first text
    /// version's third format. Every step of the chain is optional; any
    /// miss or failure yields an empty string.
    async fn fetch_short_summary(&self, detail: &BillDetail) -> String {
        let Some(link) = detail.text_versions.as_ref().filter(|l| l.count > 0) else {
            return String::new();
        };
        let Some(url) = link.url.as_deref() else {
            return String::new();
        };

        let versions = match with_retry(self.gate, url, || self.congress.get_text_versions(url))
            .await
        {
            Ok(response) => response.text_versions,
            Err(e) => {
                tracing::warn!("text versions fetch failed for {}: {}", url, e);
                return String::new();
            }
        };

        let Some(xml_url) = versions
            .first()
            .and_then(|v| v.formats.get(2))
            .and_then(|f| f.url.clone())
        else {
            return String::new();
        };

        match with_retry(self.gate, &xml_url, || self.congress.fetch_xml(&xml_url)).await {
            Ok(body) => extract_official_title(&body).unwrap_or_default(),
            Err(e) => {
                tracing::warn!("bill text fetch failed for {}: {}", xml_url, e);
                String::new()
            }
        }
    }
}

/// Filter stage: recognized type, introduction date present, real title,
/// key not already accepted this run. Accepted keys are added to
/// `exclusion` so repeats later in the pool are dropped.
pub fn filter_bills(
    bills: &[BillSummary],
    exclusion: &mut HashSet<BillKey>,
) -> Vec<CandidateBill> {
    let mut kept = Vec::new();
    for bill in bills {
        let Some(bill_type) = bill.bill_type.as_deref().and_then(BillType::parse) else {
            continue;
        };
        let (Some(congress), Some(number)) = (bill.congress, bill.number.as_deref()) else {
            continue;
        };
        let Some(introduction_date) = bill.introduced_date.clone() else {
            continue;
        };
        let Some(title) = bill.title.as_deref() else {
            continue;
        };
        if title.is_empty() || PLACEHOLDER_TITLES.contains(&title) {
            continue;
        }

        let key = BillKey {
            congress,
            bill_type: bill_type.as_str().to_string(),
            number: number.to_string(),
        };
        if !exclusion.insert(key.clone()) {
            continue;
        }

        kept.push(CandidateBill {
            key,
            title: title.to_string(),
            introduction_date,
            update_date: bill
                .latest_action
                .as_ref()
                .and_then(|a| a.action_date.clone()),
        });
    }
    kept
}

/// Rank stage: most recently introduced first, truncated to `max_relevant`.
/// Dates are ISO-8601 strings, so lexicographic order is chronological.
pub fn rank_and_truncate(mut bills: Vec<CandidateBill>, max_relevant: usize) -> Vec<CandidateBill> {
    bills.sort_by(|a, b| b.introduction_date.cmp(&a.introduction_date));
    bills.truncate(max_relevant);
    bills
}

/// Pull the text of the `<official-title>` element out of a formatted bill
/// document. Returns `None` when the element is absent or the document is
/// malformed.
pub fn extract_official_title(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut inside = false;
    let mut title = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"official-title" => {
                inside = true;
            }
            Ok(Event::Text(t)) if inside => {
                title.push_str(t.unescape().ok()?.as_ref());
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"official-title" => {
                return Some(title.trim().to_string());
            }
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(bill_type: &str, number: &str, title: &str, date: &str) -> BillSummary {
        serde_json::from_value(serde_json::json!({
            "congress": 119,
            "type": bill_type,
            "number": number,
            "title": title,
            "introducedDate": date,
            "latestAction": { "actionDate": date }
        }))
        .unwrap()
    }

    #[test]
    fn bill_type_parse_recognizes_six_vehicles() {
        for raw in ["HR", "S", "HJRES", "SJRES", "HCONRES", "SCONRES"] {
            assert!(BillType::parse(raw).is_some(), "{} should parse", raw);
        }
        assert!(BillType::parse("hr").is_some());
        assert!(BillType::parse("SAMDT").is_none());
        assert!(BillType::parse("XYZ").is_none());
        assert!(BillType::parse("").is_none());
    }

    #[test]
    fn filter_drops_unrecognized_types() {
        let bills = vec![
            summary("HR", "1", "A bill", "2025-01-03"),
            summary("XYZ", "2", "Not a bill", "2025-01-04"),
            summary("S", "3", "Another bill", "2025-01-05"),
        ];
        let mut exclusion = HashSet::new();
        let kept = filter_bills(&bills, &mut exclusion);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].key.bill_type, "HR");
        assert_eq!(kept[1].key.bill_type, "S");
    }

    #[test]
    fn filter_drops_placeholder_titles() {
        let bills = vec![
            summary("HR", "1", "Reserved for the Speaker.", "2025-01-03"),
            summary("HR", "2", "Reserved for the Minority Leader.", "2025-01-03"),
            summary("HR", "3", "An actual act", "2025-01-03"),
        ];
        let mut exclusion = HashSet::new();
        let kept = filter_bills(&bills, &mut exclusion);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "An actual act");
    }

    #[test]
    fn filter_drops_missing_date_and_title() {
        let no_date: BillSummary = serde_json::from_value(serde_json::json!({
            "congress": 119, "type": "HR", "number": "1", "title": "A bill"
        }))
        .unwrap();
        let no_title: BillSummary = serde_json::from_value(serde_json::json!({
            "congress": 119, "type": "HR", "number": "2", "introducedDate": "2025-01-03"
        }))
        .unwrap();
        let mut exclusion = HashSet::new();
        assert!(filter_bills(&[no_date, no_title], &mut exclusion).is_empty());
    }

    #[test]
    fn filter_excludes_keys_already_seen() {
        let bills = vec![
            summary("HR", "1", "First copy", "2025-01-03"),
            summary("HR", "1", "Second copy", "2025-01-04"),
        ];
        let mut exclusion = HashSet::new();
        let kept = filter_bills(&bills, &mut exclusion);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "First copy");

        // A pre-seeded exclusion set blocks the key entirely
        let mut seeded = HashSet::new();
        seeded.insert(BillKey {
            congress: 119,
            bill_type: "HR".to_string(),
            number: "1".to_string(),
        });
        assert!(filter_bills(&bills, &mut seeded).is_empty());
    }

    #[test]
    fn rank_keeps_latest_fifty_of_150() {
        let mut bills = Vec::new();
        for i in 0..150 {
            // Dates 2020-: spread across years so ordering is unambiguous
            let date = format!("{:04}-{:02}-01", 2020 + i / 12, 1 + i % 12);
            bills.push(CandidateBill {
                key: BillKey {
                    congress: 119,
                    bill_type: "HR".to_string(),
                    number: i.to_string(),
                },
                title: format!("Bill {}", i),
                introduction_date: date,
                update_date: None,
            });
        }
        let mut expected: Vec<String> = bills.iter().map(|b| b.introduction_date.clone()).collect();
        expected.sort();
        expected.reverse();
        expected.truncate(50);

        let kept = rank_and_truncate(bills, 50);
        assert_eq!(kept.len(), 50);
        let got: Vec<String> = kept.iter().map(|b| b.introduction_date.clone()).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn rank_handles_fewer_than_cap() {
        let bills = vec![CandidateBill {
            key: BillKey {
                congress: 119,
                bill_type: "S".to_string(),
                number: "1".to_string(),
            },
            title: "Only bill".to_string(),
            introduction_date: "2025-01-03".to_string(),
            update_date: None,
        }];
        assert_eq!(rank_and_truncate(bills, 50).len(), 1);
    }

    #[test]
    fn official_title_extracted() {
        let xml = r#"<?xml version="1.0"?>
            <bill>
              <form>
                <official-title>To provide for reconciliation pursuant to title II.</official-title>
              </form>
            </bill>"#;
        assert_eq!(
            extract_official_title(xml).as_deref(),
            Some("To provide for reconciliation pursuant to title II.")
        );
    }

    #[test]
    fn official_title_missing_element() {
        assert_eq!(extract_official_title("<bill><form/></bill>"), None);
    }

    #[test]
    fn official_title_malformed_document() {
        assert_eq!(extract_official_title("<bill><official-title>unclosed"), None);
    }

    #[test]
    fn official_title_unescapes_entities() {
        let xml = "<bill><official-title>Peanut &amp; Tree Nut Labeling Act</official-title></bill>";
        assert_eq!(
            extract_official_title(xml).as_deref(),
            Some("Peanut & Tree Nut Labeling Act")
        );
    }
}
