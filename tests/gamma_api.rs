//! Gamma client behavior against a mock HTTP server: pagination stops,
//! partial-result semantics, and response memoization.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use polysniper::cache::SystemClock;
use polysniper::config::GammaConfig;
use polysniper::market::gamma::GammaClient;

fn gamma_config(base_url: &str) -> GammaConfig {
    GammaConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        events_ttl_seconds: 120,
        tags_ttl_seconds: 3600,
    }
}

fn client(server: &MockServer) -> GammaClient {
    GammaClient::new(&gamma_config(&server.uri()), Arc::new(SystemClock))
        .expect("client should build")
}

fn event_json(slug: &str) -> serde_json::Value {
    json!({
        "title": "Event",
        "slug": slug,
        "description": "Resolves per https://apnews.com/results.",
        "tags": [{"id": 1, "label": "Politics"}],
        "markets": [{
            "question": "Who wins?",
            "volume": "50000",
            "endDate": "2030-01-01T00:00:00Z",
            "outcomePrices": "[\"0.5\", \"0.5\"]"
        }]
    })
}

#[tokio::test]
async fn empty_first_page_stops_the_scan() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server).fetch_events(5, None).await;
    assert!(outcome.events.is_empty());
    assert_eq!(outcome.pages_fetched, 0);
    assert!(outcome.warning.is_none());
}

#[tokio::test]
async fn pages_are_walked_in_offset_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("offset", "0"))
        .and(query_param("closed", "false"))
        .and(query_param("order", "id"))
        .and(query_param("ascending", "false"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([event_json("page-0")])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([event_json("page-1")])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server).fetch_events(5, None).await;
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.events.len(), 2);
    assert_eq!(outcome.events[0].slug.as_deref(), Some("page-0"));
    assert_eq!(outcome.events[1].slug.as_deref(), Some("page-1"));
}

#[tokio::test]
async fn tag_filter_is_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("tag_id", "17"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server).fetch_events(1, Some("17")).await;
    assert!(outcome.events.is_empty());
}

#[tokio::test]
async fn non_success_status_stops_without_warning() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([event_json("ok")])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let outcome = client(&server).fetch_events(4, None).await;
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.pages_fetched, 1);
    assert!(outcome.warning.is_none());
}

#[tokio::test]
async fn malformed_payload_keeps_partial_results_with_warning() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([event_json("ok")])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let outcome = client(&server).fetch_events(4, None).await;
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.pages_fetched, 1);
    let warning = outcome.warning.expect("truncation should be surfaced");
    assert!(warning.contains("stopped after 1 page(s)"));
}

#[tokio::test]
async fn cached_scan_does_not_refetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let gamma = client(&server);
    let first = gamma.fetch_events_cached(1, None).await;
    let second = gamma.fetch_events_cached(1, None).await;
    assert_eq!(first.pages_fetched, second.pages_fetched);
}

#[tokio::test]
async fn different_scan_shapes_are_cached_separately() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let gamma = client(&server);
    gamma.fetch_events_cached(1, None).await;
    gamma.fetch_events_cached(1, Some("17")).await;
}

#[tokio::test]
async fn tags_are_fetched_once_and_unlabeled_entries_dropped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "label": "Politics"},
            {"id": 2},
            {"id": "3", "label": "Crypto"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let gamma = client(&server);
    let tags = gamma.fetch_tags().await.unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].label, "Politics");
    assert_eq!(tags[1].id, "3");

    // Second call is served from the TTL cache.
    let again = gamma.fetch_tags().await.unwrap();
    assert_eq!(again.len(), 2);
}

#[tokio::test]
async fn tags_error_is_propagated_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let gamma = client(&server);
    assert!(gamma.fetch_tags().await.is_err());
}
