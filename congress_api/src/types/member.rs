//! Member roster and detail types.

use serde::Deserialize;

use super::Pagination;

/// Response wrapper for the `/member` roster listing.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberListResponse {
    #[serde(default)]
    pub members: Vec<MemberSummary>,
    pub pagination: Option<Pagination>,
}

/// One roster entry. Only the bioguide id is guaranteed; detail comes from
/// a follow-up `/member/{id}` call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub bioguide_id: String,
    pub name: Option<String>,
    pub party_name: Option<String>,
    pub state: Option<String>,
    pub district: Option<i64>,
    pub depiction: Option<Depiction>,
    pub url: Option<String>,
}

/// Member portrait block.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Depiction {
    pub image_url: Option<String>,
}

/// Response wrapper for `/member/{bioguide_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberDetailResponse {
    pub member: MemberDetail,
}

/// Full member record.
///
/// `birth_year` is a string on the wire ("1952"); see
/// [`MemberDetail::birth_year_or`] for the parsed form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetail {
    pub bioguide_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub direct_order_name: Option<String>,
    pub birth_year: Option<String>,
    pub current_member: Option<bool>,
    pub state: Option<String>,
    pub district: Option<i64>,
    pub depiction: Option<Depiction>,
    #[serde(default)]
    pub party_history: Vec<PartyHistory>,
    #[serde(default)]
    pub terms: Vec<MemberTerm>,
}

impl MemberDetail {
    /// Birth year parsed from the provider's string field.
    pub fn birth_year_or(&self, default: i64) -> i64 {
        self.birth_year
            .as_deref()
            .and_then(|y| y.parse().ok())
            .unwrap_or(default)
    }

    /// Party of the most recent party-history entry (max `startYear`).
    pub fn latest_party(&self) -> Option<&str> {
        self.party_history
            .iter()
            .max_by_key(|p| p.start_year.unwrap_or(0))
            .and_then(|p| p.party_name.as_deref())
    }

    /// Chamber of the most recent term (max `startYear`).
    pub fn latest_chamber(&self) -> Option<&str> {
        self.terms
            .iter()
            .max_by_key(|t| t.start_year.unwrap_or(0))
            .and_then(|t| t.chamber.as_deref())
    }
}

/// One entry of a member's party history.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyHistory {
    pub party_name: Option<String>,
    pub start_year: Option<i64>,
}

/// One congressional term of a member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberTerm {
    pub chamber: Option<String>,
    pub start_year: Option<i64>,
    pub end_year: Option<i64>,
}
