//! Integration tests for the PageSpeed Insights client
//!
//! A wiremock server stands in for the PageSpeed endpoint.

use ranksight::config::PageSpeedConfig;
use ranksight::pagespeed::{PageSpeedClient, PageSpeedError, PageSpeedProvider, PageSpeedResult};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUDITED_URL: &str = "https://acme.example/";

fn create_test_client(server: &MockServer, api_key: Option<&str>, timeout_ms: u64) -> PageSpeedClient {
    let config = PageSpeedConfig {
        endpoint: format!("{}/runPagespeed", server.uri()),
        strategy: "mobile".to_string(),
        timeout_ms,
        api_key: api_key.map(str::to_string),
    };
    PageSpeedClient::new(&config).expect("Failed to build PageSpeed client")
}

fn lighthouse_payload() -> serde_json::Value {
    json!({
        "lighthouseResult": {
            "categories": {"performance": {"score": 0.82}},
            "audits": {
                "first-contentful-paint": {"numericValue": 1234.5},
                "largest-contentful-paint": {"numericValue": 2100.0},
                "cumulative-layout-shift": {"numericValue": 0.02},
                "total-blocking-time": {"numericValue": 150.0},
                "speed-index": {"numericValue": 2800.0},
                "interactive": {"numericValue": 3900.0}
            }
        }
    })
}

#[tokio::test]
async fn test_valid_payload_is_mapped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .and(query_param("url", AUDITED_URL))
        .and(query_param("strategy", "mobile"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lighthouse_payload()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, Some("test-key"), 5_000);
    let result = client.analyze(AUDITED_URL).await;

    assert!(!result.is_degraded());
    assert_eq!(result.score, 82);
    assert_eq!(result.fcp, 1234.5);
    assert_eq!(result.lcp, 2100.0);
    assert_eq!(result.cls, 0.02);
    assert_eq!(result.tbt, 150.0);
    assert_eq!(result.speed_index, 2800.0);
    assert_eq!(result.interactive, 3900.0);
}

#[tokio::test]
async fn test_partial_payload_fills_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lighthouseResult": {
                "audits": {"largest-contentful-paint": {"numericValue": 1800.0}}
            }
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, None, 5_000);
    let result = client.analyze(AUDITED_URL).await;

    assert!(!result.is_degraded());
    assert_eq!(result.score, 50);
    assert_eq!(result.lcp, 1800.0);
    assert_eq!(result.fcp, 3000.0);
    assert_eq!(result.cls, 0.15);
}

#[tokio::test]
async fn test_server_error_degrades() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, None, 5_000);

    let err = client.fetch_report(AUDITED_URL).await.unwrap_err();
    assert!(matches!(err, PageSpeedError::Status(500)));

    let result = client.analyze(AUDITED_URL).await;
    let expected = PageSpeedResult::degraded("API returned 500");
    assert_eq!(result, expected);
}

#[tokio::test]
async fn test_malformed_payload_degrades() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, None, 5_000);
    let result = client.analyze(AUDITED_URL).await;

    assert!(result.is_degraded());
    assert_eq!(result.score, 50);
    assert!(result
        .error
        .as_deref()
        .unwrap_or_default()
        .starts_with("Malformed payload"));
}

#[tokio::test]
async fn test_missing_lighthouse_result_degrades() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": AUDITED_URL})))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, None, 5_000);
    let result = client.analyze(AUDITED_URL).await;

    assert!(result.is_degraded());
    assert_eq!(result.error.as_deref(), Some("No lighthouse data"));
    assert_eq!(result.lcp, 5000.0);
}

#[tokio::test]
async fn test_slow_response_degrades() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(lighthouse_payload())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server, None, 200);
    let result = client.analyze(AUDITED_URL).await;

    assert!(result.is_degraded());
    assert_eq!(result.score, 50);
    assert!(result
        .error
        .as_deref()
        .unwrap_or_default()
        .starts_with("Request failed"));
}
