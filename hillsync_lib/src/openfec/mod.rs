//! OpenFEC API client: candidate search, committees, financial totals, and
//! Schedule A itemized contributions.

pub mod client;
pub mod error;
pub mod types;

pub use client::OpenFecClient;
pub use error::OpenFecError;
