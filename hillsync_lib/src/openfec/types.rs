//! Types for OpenFEC API requests and responses.

use serde::Deserialize;

// ============================================================================
// Candidate types
// ============================================================================

/// Response wrapper for the candidate search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateSearchResponse {
    #[serde(default)]
    pub results: Vec<Candidate>,
    pub pagination: Option<Pagination>,
}

/// Candidate record from a name search.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub candidate_id: Option<String>,
    pub name: Option<String>,
    pub office_full: Option<String>,
    pub party: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub election_years: Vec<i32>,
}

/// Page-numbered pagination shared by the JSON endpoints used here.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub count: i64,
    pub page: Option<i64>,
    pub pages: Option<i64>,
    pub per_page: Option<i64>,
}

// ============================================================================
// Committee types
// ============================================================================

/// Response wrapper for `/candidate/{id}/committees`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitteeResponse {
    #[serde(default)]
    pub results: Vec<Committee>,
    pub pagination: Option<Pagination>,
}

/// Committee authorized by a candidate. The provider occasionally returns
/// entries without an id; those are skipped downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct Committee {
    pub committee_id: Option<String>,
    pub name: Option<String>,
    pub committee_type: Option<String>,
    pub designation: Option<String>,
}

// ============================================================================
// Financial totals
// ============================================================================

/// Response wrapper for `/candidate/{id}/totals`.
#[derive(Debug, Clone, Deserialize)]
pub struct TotalsResponse {
    #[serde(default)]
    pub results: Vec<CandidateTotals>,
    pub pagination: Option<Pagination>,
}

/// Per-election-year financial aggregates for a candidate. Every amount is
/// optional; absent values persist as the -1 "unknown" sentinel.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateTotals {
    pub candidate_election_year: Option<i32>,
    pub other_political_committee_contributions: Option<f64>,
    pub individual_itemized_contributions: Option<f64>,
    pub individual_unitemized_contributions: Option<f64>,
    pub disbursements: Option<f64>,
    pub contributions: Option<f64>,
}

// ============================================================================
// Schedule A (contribution) types
// ============================================================================

/// Response wrapper for the Schedule A endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleAResponse {
    #[serde(default)]
    pub results: Vec<Contribution>,
}

/// One itemized contribution record.
#[derive(Debug, Clone, Deserialize)]
pub struct Contribution {
    pub contributor_name: Option<String>,
    pub committee: Option<CommitteeRef>,
    pub entity_type: Option<String>,
    pub contribution_receipt_date: Option<String>,
    pub contribution_receipt_amount: Option<f64>,
}

/// Committee reference nested in contribution records.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitteeRef {
    pub committee_id: Option<String>,
    pub name: Option<String>,
}

// ============================================================================
// Query builders
// ============================================================================

/// Query builder for the candidate search endpoint.
#[derive(Debug, Clone, Default)]
pub struct CandidateSearchQuery {
    pub name: Option<String>,
    pub per_page: Option<i32>,
}

impl CandidateSearchQuery {
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_per_page(mut self, per_page: i32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Build query parameter pairs, excluding unset fields.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(ref name) = self.name {
            params.push(("name".to_string(), name.clone()));
        }
        if let Some(per_page) = self.per_page {
            params.push(("per_page".to_string(), per_page.to_string()));
        }
        params
    }
}

/// Query builder for one amount-sorted Schedule A page.
///
/// The donor pipeline caps itself at a single page per committee, so no
/// pagination cursor is carried; the sort and `per_page` cap together bound
/// the result set to the top contributions by amount.
#[derive(Debug, Clone, Default)]
pub struct ScheduleAQuery {
    pub committee_id: Option<String>,
    pub two_year_transaction_period: Option<i32>,
    pub per_page: Option<i32>,
    pub sort: Option<String>,
}

impl ScheduleAQuery {
    pub fn with_committee_id(mut self, committee_id: &str) -> Self {
        self.committee_id = Some(committee_id.to_string());
        self
    }

    pub fn with_cycle(mut self, cycle: i32) -> Self {
        self.two_year_transaction_period = Some(cycle);
        self
    }

    pub fn with_per_page(mut self, per_page: i32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn sorted_by_amount_desc(mut self) -> Self {
        self.sort = Some("-contribution_receipt_amount".to_string());
        self
    }

    /// Build query parameter pairs, excluding unset fields.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(ref committee_id) = self.committee_id {
            params.push(("committee_id".to_string(), committee_id.clone()));
        }
        if let Some(cycle) = self.two_year_transaction_period {
            params.push((
                "two_year_transaction_period".to_string(),
                cycle.to_string(),
            ));
        }
        if let Some(per_page) = self.per_page {
            params.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(ref sort) = self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        params
    }
}
