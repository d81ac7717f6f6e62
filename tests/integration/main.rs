//! Integration tests for the analytics proxy.
//!
//! The full router runs against a local stand-in for the Instantly API,
//! so every outbound call goes through the real reqwest client.
//! Run with: cargo test --test integration


use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio_test::assert_ok;
use tower::ServiceExt;

use instantly_analytics_proxy::analytics::MOCK_ANALYTICS_JSON;
use instantly_analytics_proxy::api::{create_router, AppState};
use instantly_analytics_proxy::config::Config;
use instantly_analytics_proxy::instantly::InstantlyClient;

use upstream::{FakeInstantly, API_KEY};

/// The two-campaign scenario: A (c1) and evergreen B (c2).
fn scenario() -> FakeInstantly {
    FakeInstantly::new()
        .campaign(
            json!({ "id": "c1", "status": 1, "name": "A", "is_evergreen": false, "timestamp_created": "2025-09-30T12:00:00Z" }),
            json!([{ "date": "2025-10-01", "sent": 40, "opened": 22, "replies": 3 }]),
            json!({ "emails_sent_count": 40, "total_opportunities": 1, "total_meeting_booked": 1, "total_closed": 0 }),
        )
        .campaign(
            json!({ "id": "c2", "status": 1, "name": "B", "is_evergreen": true }),
            json!([{ "date": "2025-10-02", "sent": 15, "opened": 9, "replies": 1 }]),
            json!({ "emails_sent_count": 15, "total_opportunities": 0, "total_meeting_booked": 0, "total_closed": 0 }),
        )
}

async fn proxy(config: Config, fake: FakeInstantly) -> Router {
    let base_url = fake.spawn().await;
    let client = assert_ok!(InstantlyClient::with_base_url(config.api_key(), base_url));
    create_router(AppState::new(config, client))
}

fn live(api_key: &str) -> Config {
    Config {
        instantly_api_key: Some(api_key.to_string()),
        ..Config::default()
    }
}

async fn fetch(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn live_analytics_merges_both_campaigns_in_order() {
    let app = proxy(live(API_KEY), scenario()).await;

    let (status, body) = fetch(app, "/api/analytics").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!([
            {
                "campaign_name": "A",
                "campaign_id": "c1",
                "campaign_status": 1,
                "campaign_is_evergreen": false,
                "overview": { "emails_sent_count": 40, "total_opportunities": 1, "total_meeting_booked": 1, "total_closed": 0 },
                "daily": [{ "date": "2025-10-01", "sent": 40, "opened": 22, "replies": 3 }]
            },
            {
                "campaign_name": "B",
                "campaign_id": "c2",
                "campaign_status": 1,
                "campaign_is_evergreen": true,
                "overview": { "emails_sent_count": 15, "total_opportunities": 0, "total_meeting_booked": 0, "total_closed": 0 },
                "daily": [{ "date": "2025-10-02", "sent": 15, "opened": 9, "replies": 1 }]
            }
        ])
    );
}

#[tokio::test]
async fn outbound_calls_carry_fixed_query_values() {
    let fake = scenario();
    let app = proxy(live(API_KEY), fake.clone()).await;

    let (status, _) = fetch(app, "/api/analytics").await;
    assert_eq!(status, StatusCode::OK);

    let hits = fake.hits();
    assert_eq!(hits.len(), 5);

    let (path, query) = &hits[0];
    assert_eq!(path, "/campaigns");
    assert_eq!(query.get("limit").map(String::as_str), Some("2"));

    let daily_c1 = hits
        .iter()
        .find(|(p, q)| p == "/campaigns/analytics/daily" && q.get("campaign_id").map(String::as_str) == Some("c1"))
        .expect("daily call for c1");
    assert_eq!(daily_c1.1.get("campaign_status").map(String::as_str), Some("1"));
    assert_eq!(daily_c1.1.get("start_date").map(String::as_str), Some("2025-10-01"));
    assert_eq!(daily_c1.1.get("end_date").map(String::as_str), Some("2025-10-25"));

    let overview_c2 = hits
        .iter()
        .find(|(p, q)| p == "/campaigns/analytics/overview" && q.get("id").map(String::as_str) == Some("c2"))
        .expect("overview call for c2");
    assert_eq!(overview_c2.1.get("expand_crm_events").map(String::as_str), Some("true"));
    assert_eq!(overview_c2.1.get("start_date").map(String::as_str), Some("2025-10-01"));
    assert_eq!(overview_c2.1.get("end_date").map(String::as_str), Some("2025-10-25"));
}

#[tokio::test]
async fn only_the_first_two_campaigns_are_fetched() {
    let fake = scenario().campaign(
        json!({ "id": "c3", "status": 2, "name": "C", "is_evergreen": false }),
        json!([]),
        json!({}),
    );
    let app = proxy(live(API_KEY), fake.clone()).await;

    let (status, body) = fetch(app, "/api/analytics").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(fake.hit_count(), 5);
}

#[tokio::test]
async fn rejected_key_surfaces_upstream_payload() {
    let app = proxy(live("wrong-key"), scenario()).await;

    let (status, body) = fetch(app, "/api/analytics").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "error": "Failed to fetch analytics",
            "details": { "statusCode": 401, "error": "Unauthorized", "message": "Invalid API key" }
        })
    );
}

#[tokio::test]
async fn empty_campaign_list_fails_the_request() {
    let fake = FakeInstantly::new();
    let app = proxy(live(API_KEY), fake.clone()).await;

    let (status, body) = fetch(app, "/api/analytics").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["details"], json!({ "message": "no campaigns found" }));
    assert_eq!(fake.hit_count(), 1);
}

#[tokio::test]
async fn one_overview_failure_fails_the_whole_response() {
    let mut fake = scenario();
    fake.fail_overview_for = Some("c2".to_string());
    let app = proxy(live(API_KEY), fake.clone()).await;

    let (status, body) = fetch(app, "/api/analytics").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(!body.is_array());
    assert_eq!(body["details"], json!({ "error": "overview unavailable" }));
    // Sibling calls still ran.
    assert_eq!(fake.hit_count(), 5);
}

#[tokio::test]
async fn malformed_payload_is_reported_with_message() {
    let mut fake = scenario();
    fake.malformed_daily_for = Some("c1".to_string());
    let app = proxy(live(API_KEY), fake).await;

    let (status, body) = fetch(app, "/api/analytics").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    let message = body["details"]["message"].as_str().unwrap_or_default();
    assert!(
        message.contains("/campaigns/analytics/daily"),
        "unexpected message: {message}"
    );
}

#[tokio::test]
async fn mock_mode_never_calls_upstream() {
    let fake = scenario();
    let config = Config {
        use_mock: true,
        ..Config::default()
    };
    let app = proxy(config, fake.clone()).await;

    let (status, body) = fetch(app.clone(), "/api/analytics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, MOCK_ANALYTICS_JSON.as_bytes());

    let (status, body) = fetch(app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "ok": true, "useMock": true }));

    assert_eq!(fake.hit_count(), 0);
}
