//! OpenFEC API client implementation.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::error::OpenFecError;
use super::types::{
    CandidateSearchQuery, CandidateSearchResponse, CommitteeResponse, ScheduleAQuery,
    ScheduleAResponse, TotalsResponse,
};

/// Request timeout for OpenFEC API calls. Schedule A queries can be slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// OpenFEC API client.
pub struct OpenFecClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenFecClient {
    /// Creates a client pointing at the production API.
    pub fn new(api_key: String) -> Result<Self, OpenFecError> {
        Self::with_base_url("https://api.open.fec.gov/v1", api_key)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: &str, api_key: String) -> Result<Self, OpenFecError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(OpenFecError::Network)?;
        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, OpenFecError> {
        let url = format!("{}{}", self.base_url, path);

        let mut all_params = params.to_vec();
        all_params.push(("api_key".to_string(), self.api_key.clone()));

        let response = self.http.get(&url).query(&all_params).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OpenFecError::RateLimited);
        } else if status == reqwest::StatusCode::FORBIDDEN {
            return Err(OpenFecError::InvalidApiKey);
        } else if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            tracing::error!("request to {} failed with HTTP {}", url, status);
            return Err(OpenFecError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| OpenFecError::Parse(e.to_string()))
    }

    /// Search for candidates by name.
    pub async fn search_candidates(
        &self,
        query: &CandidateSearchQuery,
    ) -> Result<CandidateSearchResponse, OpenFecError> {
        self.get("/candidates/search/", &query.to_query_pairs())
            .await
    }

    /// Get committees authorized by a candidate.
    pub async fn get_candidate_committees(
        &self,
        candidate_id: &str,
    ) -> Result<CommitteeResponse, OpenFecError> {
        let path = format!("/candidate/{}/committees/", candidate_id);
        self.get(&path, &[]).await
    }

    /// Get lifetime per-election-year financial totals for a candidate.
    pub async fn get_candidate_totals(
        &self,
        candidate_id: &str,
    ) -> Result<TotalsResponse, OpenFecError> {
        let path = format!("/candidate/{}/totals/", candidate_id);
        self.get(&path, &[]).await
    }

    /// Get one page of Schedule A itemized contributions.
    pub async fn get_schedule_a(
        &self,
        query: &ScheduleAQuery,
    ) -> Result<ScheduleAResponse, OpenFecError> {
        self.get("/schedules/schedule_a/", &query.to_query_pairs())
            .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Back off to a char boundary; slicing mid-character would panic.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_short_passthrough() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        // 67 three-byte characters = 201 bytes; byte 200 is mid-character
        let body = "€".repeat(67);
        let snippet = truncate_body(&body);
        assert!(snippet.ends_with("..."));
        assert_eq!(snippet.trim_end_matches("..."), "€".repeat(66));
    }
}
