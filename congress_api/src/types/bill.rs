//! Bill listing and detail types.

use serde::Deserialize;

use super::Pagination;

/// Response wrapper for `/member/{id}/sponsored-legislation`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsoredLegislationResponse {
    #[serde(default)]
    pub sponsored_legislation: Vec<BillSummary>,
    pub pagination: Option<Pagination>,
}

/// A bill as it appears in list responses. Amendments and reserved slots
/// show up in the same array with fields missing, hence the options.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSummary {
    pub congress: Option<i64>,
    #[serde(rename = "type")]
    pub bill_type: Option<String>,
    pub number: Option<String>,
    pub title: Option<String>,
    pub introduced_date: Option<String>,
    pub latest_action: Option<LatestAction>,
}

/// Most recent recorded action on a bill.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestAction {
    pub action_date: Option<String>,
}

/// Response wrapper for `/bill/{congress}/{type}/{number}`.
#[derive(Debug, Clone, Deserialize)]
pub struct BillDetailResponse {
    pub bill: BillDetail,
}

/// Bill detail. Subjects and text versions are counted links to follow-up
/// endpoints rather than inline data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDetail {
    pub subjects: Option<CountedLink>,
    pub text_versions: Option<CountedLink>,
    #[serde(default)]
    pub sponsors: Vec<BillSponsorRef>,
}

/// A `{count, url}` pair pointing at a sub-resource listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CountedLink {
    #[serde(default)]
    pub count: i64,
    pub url: Option<String>,
}

/// Sponsor entry on a bill detail record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSponsorRef {
    pub bioguide_id: Option<String>,
}

/// Response wrapper for the bill subjects follow-up endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectsResponse {
    pub subjects: Option<SubjectsBody>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectsBody {
    #[serde(default)]
    pub legislative_subjects: Vec<NamedItem>,
    pub policy_area: Option<NamedItem>,
}

/// A `{name}` object as used for subjects and policy areas.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedItem {
    pub name: Option<String>,
}

/// Response wrapper for the bill text-versions follow-up endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextVersionsResponse {
    #[serde(default)]
    pub text_versions: Vec<TextVersion>,
}

/// One published text version of a bill with its available formats.
#[derive(Debug, Clone, Deserialize)]
pub struct TextVersion {
    #[serde(default)]
    pub formats: Vec<TextFormat>,
}

/// One downloadable format of a text version.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFormat {
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub format_type: Option<String>,
}
