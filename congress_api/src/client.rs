//! HTTP client for the congress.gov v3 API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::query::{MemberListQuery, PageQuery};
use crate::types::{
    BillDetailResponse, MemberDetailResponse, MemberListResponse,
    SponsoredLegislationResponse, SubjectsResponse, TextVersionsResponse,
};
use crate::Error;

/// Request timeout for congress.gov API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the congress.gov v3 API.
///
/// The API key is passed as a query parameter on every request; all JSON
/// endpoints additionally get `format=json`.
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl Client {
    /// Creates a client pointing at the production API.
    pub fn new(api_key: String) -> Result<Self, Error> {
        Self::with_base_url("https://api.congress.gov/v3", api_key)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: &str, api_key: String) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::Network)?;
        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<T, Error> {
        let mut all_params = params.to_vec();
        all_params.push(("format".to_string(), "json".to_string()));
        all_params.push(("api_key".to_string(), self.api_key.clone()));

        let response = self
            .http
            .get(url)
            .header("accept", "application/json")
            .query(&all_params)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        } else if status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::InvalidApiKey);
        } else if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            tracing::error!("request to {} failed with HTTP {}", url, status);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Parse(e.to_string()))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetches a page of the member roster.
    pub async fn list_members(
        &self,
        query: &MemberListQuery,
    ) -> Result<MemberListResponse, Error> {
        self.get(&self.endpoint("/member"), &query.to_query_pairs())
            .await
    }

    /// Fetches full detail for a single member.
    pub async fn get_member(&self, bioguide_id: &str) -> Result<MemberDetailResponse, Error> {
        let url = self.endpoint(&format!("/member/{}", bioguide_id));
        self.get(&url, &[]).await
    }

    /// Fetches a page of a member's sponsored legislation.
    pub async fn sponsored_legislation(
        &self,
        bioguide_id: &str,
        page: &PageQuery,
    ) -> Result<SponsoredLegislationResponse, Error> {
        let url = self.endpoint(&format!("/member/{}/sponsored-legislation", bioguide_id));
        self.get(&url, &page.to_query_pairs()).await
    }

    /// Fetches detail for a single bill.
    pub async fn get_bill(
        &self,
        congress: i64,
        bill_type: &str,
        number: &str,
    ) -> Result<BillDetailResponse, Error> {
        let url = self.endpoint(&format!(
            "/bill/{}/{}/{}",
            congress,
            bill_type.to_lowercase(),
            number
        ));
        self.get(&url, &[]).await
    }

    /// Follows the subjects URL embedded in a bill detail response.
    pub async fn get_subjects(&self, url: &str) -> Result<SubjectsResponse, Error> {
        let url = self.validate_follow_up(url)?;
        self.get(&url, &[]).await
    }

    /// Follows the text-versions URL embedded in a bill detail response.
    pub async fn get_text_versions(&self, url: &str) -> Result<TextVersionsResponse, Error> {
        let url = self.validate_follow_up(url)?;
        self.get(&url, &[]).await
    }

    /// Fetches a formatted bill text document as raw XML.
    ///
    /// The response body is returned unparsed; callers extract what they
    /// need from it.
    pub async fn fetch_xml(&self, url: &str) -> Result<String, Error> {
        let url = Url::parse(url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let response = self
            .http
            .get(url)
            .header("accept", "application/xml")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(response.text().await?)
    }

    /// Provider responses embed absolute follow-up URLs; parse them rather
    /// than trusting string concatenation downstream.
    fn validate_follow_up(&self, url: &str) -> Result<String, Error> {
        let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(parsed.to_string())
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
