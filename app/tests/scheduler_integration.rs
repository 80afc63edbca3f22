//! Integration tests for scheduler.rs
//!
//! Runs the real refresh tasks against mocked endpoints and observes the
//! published snapshots.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::doc_markdown
)]

use dashboard::config::RefreshIntervals;
use dashboard::reference::sample_conditions;
use dashboard::scheduler::RefreshScheduler;
use dashboard::source::{FETCH_FAILED_MESSAGE, RouteSource};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);
const HOURLY: Duration = Duration::from_secs(3600);

fn route_body(destination: &str) -> Value {
    json!({
        "success": true,
        "routes": [
            {
                "destination": destination,
                "location": { "lat": -6.4025, "lng": 106.7942 },
                "distance_km": 35.5,
                "eta": 0.75
            }
        ]
    })
}

fn conditions_body() -> Value {
    json!({
        "traffic": { "Depok": { "level": "light", "color": "#44ff44" } },
        "weather": { "Depok": { "condition": "Cerah", "temp": 31, "humidity": 60 } }
    })
}

fn source(mock_server: &MockServer, conditions: bool) -> Arc<RouteSource> {
    let conditions_url = conditions.then(|| format!("{}/conditions", mock_server.uri()));
    Arc::new(
        RouteSource::new(
            vec![format!("{}/routes", mock_server.uri())],
            conditions_url,
            Duration::from_secs(5),
        )
        .unwrap()
        .with_retry_delay(Duration::from_millis(10)),
    )
}

fn intervals(routes: Duration, conditions: Duration) -> RefreshIntervals {
    RefreshIntervals { routes, conditions }
}

#[tokio::test]
async fn test_publishes_live_snapshot() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(route_body("Depok")))
        .mount(&mock_server)
        .await;

    let scheduler = RefreshScheduler::start(source(&mock_server, false), intervals(HOURLY, HOURLY));
    let snapshots = scheduler.snapshots();

    let snapshot = timeout(WAIT, snapshots.wait_for_routes(|_| true))
        .await
        .unwrap()
        .unwrap();

    assert!(!snapshot.is_fallback);
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.dataset.routes.len(), 1);
    assert_eq!(snapshot.vehicles[0].route.as_deref(), Some("Depok"));

    scheduler.stop().await;
}

#[tokio::test]
async fn test_loading_until_first_refresh() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(route_body("Depok"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let scheduler = RefreshScheduler::start(source(&mock_server, false), intervals(HOURLY, HOURLY));
    let snapshots = scheduler.snapshots();

    assert!(snapshots.routes().is_none());

    let snapshot = timeout(WAIT, snapshots.wait_for_routes(|_| true)).await.unwrap();
    assert!(snapshot.is_some());
    assert!(snapshots.routes().is_some());

    scheduler.stop().await;
}

#[tokio::test]
async fn test_source_down_publishes_fallback() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let scheduler = RefreshScheduler::start(source(&mock_server, false), intervals(HOURLY, HOURLY));
    let snapshot = timeout(WAIT, scheduler.snapshots().wait_for_routes(|_| true))
        .await
        .unwrap()
        .unwrap();

    assert!(snapshot.is_fallback);
    assert_eq!(snapshot.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
    assert_eq!(snapshot.dataset.routes.len(), 4);
    assert_eq!(snapshot.vehicles.len(), 4);

    scheduler.stop().await;
}

#[tokio::test]
async fn test_manual_refresh_replaces_fallback() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(route_body("Depok")))
        .mount(&mock_server)
        .await;

    let scheduler = RefreshScheduler::start(source(&mock_server, false), intervals(HOURLY, HOURLY));
    let snapshots = scheduler.snapshots();

    let first = timeout(WAIT, snapshots.wait_for_routes(|_| true))
        .await
        .unwrap()
        .unwrap();
    assert!(first.is_fallback);

    snapshots.request_refresh();

    let second = timeout(WAIT, snapshots.wait_for_routes(|s| !s.is_fallback))
        .await
        .expect("manual refresh should not wait for the hourly tick")
        .unwrap();
    assert!(second.error.is_none());
    assert_ne!(first.fingerprint, second.fingerprint);

    scheduler.stop().await;
}

#[tokio::test]
async fn test_timed_refresh_picks_up_changes() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(route_body("Depok")))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(route_body("Cikarang")))
        .mount(&mock_server)
        .await;

    let scheduler = RefreshScheduler::start(
        source(&mock_server, false),
        intervals(Duration::from_millis(50), HOURLY),
    );

    let snapshot = timeout(
        WAIT,
        scheduler.snapshots().wait_for_routes(|s| {
            s.dataset.routes[0].destination.as_deref() == Some("Cikarang")
        }),
    )
    .await
    .unwrap();
    assert!(snapshot.is_some());

    scheduler.stop().await;
}

#[tokio::test]
async fn test_conditions_default_to_sample_tables() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let scheduler = RefreshScheduler::start(source(&mock_server, false), intervals(HOURLY, HOURLY));
    let state = timeout(
        WAIT,
        scheduler
            .snapshots()
            .wait_for_conditions(|c| c.updated_at.is_some()),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(state.conditions, sample_conditions());
    assert!(state.error.is_none());

    scheduler.stop().await;
}

#[tokio::test]
async fn test_conditions_failure_keeps_previous_tables() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(route_body("Depok")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/conditions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(conditions_body()))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/conditions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let scheduler = RefreshScheduler::start(
        source(&mock_server, true),
        intervals(HOURLY, Duration::from_millis(50)),
    );
    let snapshots = scheduler.snapshots();

    let state = timeout(WAIT, snapshots.wait_for_conditions(|c| c.error.is_some()))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(state.conditions.traffic["Depok"].color, "#44ff44");
    assert!(state.updated_at.is_some());

    // The route task is unaffected.
    let routes = timeout(WAIT, snapshots.wait_for_routes(|_| true))
        .await
        .unwrap()
        .unwrap();
    assert!(!routes.is_fallback);

    scheduler.stop().await;
}

#[tokio::test]
async fn test_stop_ends_both_tasks() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(route_body("Depok")))
        .mount(&mock_server)
        .await;

    let scheduler = RefreshScheduler::start(source(&mock_server, false), intervals(HOURLY, HOURLY));
    let snapshots = scheduler.snapshots();
    timeout(WAIT, snapshots.wait_for_routes(|_| true))
        .await
        .unwrap();

    timeout(WAIT, scheduler.stop()).await.unwrap();

    // Publishers are gone, so waiting for a new state returns immediately.
    assert!(snapshots.wait_for_routes(|_| false).await.is_none());
    assert!(snapshots.wait_for_conditions(|_| false).await.is_none());
    assert!(snapshots.routes().is_some());
}

#[tokio::test]
async fn test_stop_interrupts_slow_refresh() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(route_body("Depok"))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;

    let scheduler = RefreshScheduler::start(source(&mock_server, false), intervals(HOURLY, HOURLY));
    let snapshots = scheduler.snapshots();
    tokio::time::sleep(Duration::from_millis(50)).await;

    timeout(Duration::from_secs(2), scheduler.stop()).await.unwrap();
    assert!(snapshots.routes().is_none());
}
