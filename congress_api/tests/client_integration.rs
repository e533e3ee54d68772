use congress_api::types::{
    BillDetailResponse, MemberDetailResponse, MemberListResponse,
    SponsoredLegislationResponse, SubjectsResponse, TextVersionsResponse,
};
use congress_api::{Client, Error, MemberListQuery, PageQuery};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Deserialization tests - validate fixtures parse into typed structs
// ============================================================================

#[test]
fn deserialize_member_list_fixture() {
    let fixture = include_str!("fixtures/member_list.json");
    let response: MemberListResponse = serde_json::from_str(fixture).unwrap();

    assert_eq!(response.members.len(), 2);
    assert_eq!(response.members[0].bioguide_id, "S000033");
    assert_eq!(response.members[0].party_name.as_deref(), Some("Independent"));
    assert_eq!(response.members[0].district, None);
    assert_eq!(response.members[1].district, Some(11));
    assert_eq!(response.pagination.unwrap().count, 2);
}

#[test]
fn deserialize_member_detail_fixture() {
    let fixture = include_str!("fixtures/member_detail.json");
    let response: MemberDetailResponse = serde_json::from_str(fixture).unwrap();

    let member = &response.member;
    assert_eq!(member.bioguide_id, "S000033");
    assert_eq!(member.first_name.as_deref(), Some("Bernard"));
    assert_eq!(member.birth_year_or(-1), 1941);
    assert_eq!(member.latest_party(), Some("Independent"));
    assert_eq!(member.latest_chamber(), Some("Senate"));
    assert_eq!(member.current_member, Some(true));
}

#[test]
fn deserialize_sponsored_legislation_fixture() {
    let fixture = include_str!("fixtures/sponsored_legislation.json");
    let response: SponsoredLegislationResponse = serde_json::from_str(fixture).unwrap();

    assert_eq!(response.sponsored_legislation.len(), 3);
    let bill = &response.sponsored_legislation[0];
    assert_eq!(bill.bill_type.as_deref(), Some("S"));
    assert_eq!(bill.number.as_deref(), Some("1462"));
    assert_eq!(bill.introduced_date.as_deref(), Some("2025-04-29"));
    // Amendments appear in the same array with most fields null
    assert_eq!(response.sponsored_legislation[1].title, None);
}

#[test]
fn deserialize_bill_detail_fixture() {
    let fixture = include_str!("fixtures/bill_detail.json");
    let response: BillDetailResponse = serde_json::from_str(fixture).unwrap();

    let bill = &response.bill;
    assert_eq!(bill.subjects.as_ref().unwrap().count, 2);
    assert_eq!(bill.text_versions.as_ref().unwrap().count, 1);
    assert_eq!(bill.sponsors.len(), 1);
    assert_eq!(bill.sponsors[0].bioguide_id.as_deref(), Some("S000033"));
}

#[test]
fn deserialize_subjects_fixture() {
    let fixture = include_str!("fixtures/subjects.json");
    let response: SubjectsResponse = serde_json::from_str(fixture).unwrap();

    let body = response.subjects.unwrap();
    assert_eq!(body.legislative_subjects.len(), 2);
    assert_eq!(
        body.legislative_subjects[0].name.as_deref(),
        Some("Health care coverage and access")
    );
    assert_eq!(body.policy_area.unwrap().name.as_deref(), Some("Health"));
}

#[test]
fn deserialize_text_versions_fixture() {
    let fixture = include_str!("fixtures/text_versions.json");
    let response: TextVersionsResponse = serde_json::from_str(fixture).unwrap();

    assert_eq!(response.text_versions.len(), 1);
    let formats = &response.text_versions[0].formats;
    assert_eq!(formats.len(), 3);
    assert_eq!(formats[2].format_type.as_deref(), Some("Formatted XML"));
    assert!(formats[2].url.as_deref().unwrap().ends_with(".xml"));
}

// ============================================================================
// Client tests against wiremock
// ============================================================================

#[tokio::test]
async fn list_members_sends_api_key_and_format() {
    let server = MockServer::start().await;
    let fixture = include_str!("fixtures/member_list.json");

    Mock::given(method("GET"))
        .and(path("/member"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("format", "json"))
        .and(query_param("congress", "119"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture))
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
    let query = MemberListQuery::default().with_congress(119);
    let response = client.list_members(&query).await.unwrap();

    assert_eq!(response.members.len(), 2);
}

#[tokio::test]
async fn get_member_builds_path() {
    let server = MockServer::start().await;
    let fixture = include_str!("fixtures/member_detail.json");

    Mock::given(method("GET"))
        .and(path("/member/S000033"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture))
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
    let response = client.get_member("S000033").await.unwrap();

    assert_eq!(response.member.bioguide_id, "S000033");
}

#[tokio::test]
async fn sponsored_legislation_pages_with_offset_limit() {
    let server = MockServer::start().await;
    let fixture = include_str!("fixtures/sponsored_legislation.json");

    Mock::given(method("GET"))
        .and(path("/member/S000033/sponsored-legislation"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture))
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
    let response = client
        .sponsored_legislation("S000033", &PageQuery::new(0, 250))
        .await
        .unwrap();

    assert_eq!(response.sponsored_legislation.len(), 3);
}

#[tokio::test]
async fn get_bill_lowercases_type_in_path() {
    let server = MockServer::start().await;
    let fixture = include_str!("fixtures/bill_detail.json");

    Mock::given(method("GET"))
        .and(path("/bill/119/s/1462"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture))
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
    let response = client.get_bill(119, "S", "1462").await.unwrap();

    assert_eq!(response.bill.sponsors.len(), 1);
}

#[tokio::test]
async fn fetch_xml_returns_raw_body() {
    let server = MockServer::start().await;
    let xml = r#"<bill><official-title>An Act to test.</official-title></bill>"#;

    Mock::given(method("GET"))
        .and(path("/doc.xml"))
        .and(header("accept", "application/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(xml))
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
    let body = client
        .fetch_xml(&format!("{}/doc.xml", server.uri()))
        .await
        .unwrap();

    assert!(body.contains("official-title"));
}

#[tokio::test]
async fn rate_limit_status_maps_to_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/member"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
    let result = client.list_members(&MemberListQuery::default()).await;

    assert!(matches!(result, Err(Error::RateLimited)));
}

#[tokio::test]
async fn forbidden_status_maps_to_invalid_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/member"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri(), "bad-key".to_string()).unwrap();
    let result = client.list_members(&MemberListQuery::default()).await;

    assert!(matches!(result, Err(Error::InvalidApiKey)));
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/member"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
    let result = client.list_members(&MemberListQuery::default()).await;

    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected HttpStatus error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn server_error_with_multibyte_body_truncates_safely() {
    let server = MockServer::start().await;
    // 67 three-byte characters = 201 bytes, so the truncation point falls
    // inside a character
    let body = "€".repeat(67);

    Mock::given(method("GET"))
        .and(path("/member"))
        .respond_with(ResponseTemplate::new(500).set_body_string(body))
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
    let result = client.list_members(&MemberListQuery::default()).await;

    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.ends_with("..."));
            assert_eq!(body.trim_end_matches("..."), "€".repeat(66));
        }
        other => panic!("expected HttpStatus error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn malformed_json_maps_to_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/member"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
    let result = client.list_members(&MemberListQuery::default()).await;

    assert!(matches!(result, Err(Error::Parse(_))));
}
