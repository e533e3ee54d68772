//! Async client for the congress.gov v3 API.
//!
//! Covers the endpoints the ingestion pipelines need: the member roster,
//! per-member detail, sponsored legislation, per-bill detail, and the
//! follow-up URLs bill detail responses embed (subjects, text versions).
//! Formatted bill text is fetched as raw XML for the caller to parse.

pub mod client;
pub mod errors;
pub mod query;
pub mod types;

pub use client::Client;
pub use errors::Error;
pub use query::{MemberListQuery, PageQuery};
