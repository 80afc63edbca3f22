#![allow(clippy::unwrap_used, clippy::panic)]

use dashboard::error::DashboardError;
use std::error::Error;
use wiremock::{Mock, MockServer, ResponseTemplate};

// Test Display implementation for Parse variant
#[test]
fn test_parse_error_display() {
    let err = DashboardError::Parse("expected value at line 1".to_string());
    assert_eq!(err.to_string(), "JSON parse error: expected value at line 1");
}

#[test]
fn test_config_error_display() {
    let err = DashboardError::Config("Invalid ROUTE_REFRESH_SECS".to_string());
    assert_eq!(err.to_string(), "Configuration error: Invalid ROUTE_REFRESH_SECS");
}

#[test]
fn test_service_unavailable_display() {
    let err = DashboardError::ServiceUnavailable;
    assert_eq!(err.to_string(), "Service temporarily unavailable (503)");
}

#[test]
fn test_invalid_response_display() {
    let err = DashboardError::InvalidResponse("HTTP 404 Not Found".to_string());
    assert_eq!(err.to_string(), "Invalid response: HTTP 404 Not Found");
}

#[test]
fn test_no_source_display() {
    assert_eq!(
        DashboardError::NoSource.to_string(),
        "No route data source configured"
    );
}

// From<serde_json::Error>
#[test]
fn test_serde_error_becomes_parse() {
    let serde_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: DashboardError = serde_err.into();

    assert!(matches!(err, DashboardError::Parse(_)));
    assert!(err.source().is_none());
}

async fn reqwest_error_for(status: u16) -> reqwest::Error {
    let mock_server = MockServer::start().await;

    Mock::given(wiremock::matchers::method("GET"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&mock_server)
        .await;

    reqwest::Client::new()
        .get(format!("{}/status", mock_server.uri()))
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .unwrap_err()
}

// From<reqwest::Error> for 503 status
#[tokio::test]
async fn test_reqwest_503_becomes_service_unavailable() {
    let err: DashboardError = reqwest_error_for(503).await.into();

    match err {
        DashboardError::ServiceUnavailable => {}
        other => panic!("Expected ServiceUnavailable variant, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_reqwest_non_503_becomes_http() {
    let err: DashboardError = reqwest_error_for(404).await.into();

    match &err {
        DashboardError::Http(_) => {
            assert!(err.to_string().starts_with("HTTP error:"));
            assert!(err.source().is_some());
        }
        other => panic!("Expected Http variant, got: {other:?}"),
    }
}
