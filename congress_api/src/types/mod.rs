//! Response DTOs for the congress.gov v3 API.
//!
//! Fields the ingestion pipelines require are typed as such; everything the
//! provider sometimes omits is `Option` or defaulted, so missing-field
//! handling is decided here rather than at each call site.

pub mod bill;
pub mod member;

use serde::Deserialize;

pub use bill::{
    BillDetail, BillDetailResponse, BillSummary, CountedLink, LatestAction, NamedItem,
    SponsoredLegislationResponse, SubjectsResponse, TextFormat, TextVersion,
    TextVersionsResponse,
};
pub use member::{
    Depiction, MemberDetail, MemberDetailResponse, MemberListResponse, MemberSummary,
    MemberTerm, PartyHistory,
};

/// Offset/limit pagination block shared by list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub count: i64,
    pub next: Option<String>,
}
