use crate::tests::{client_for, hits, settle};
use crate::{AccessControlMode, ServiceState};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

#[tokio::test]
async fn test_stats_poll_shows_running_and_stopped() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"server_running": true, "sd_running": false})),
        )
        .mount(&mock_server)
        .await;

    let dashboard = client_for(&mock_server, AccessControlMode::Combined).dashboard();
    let handle = dashboard
        .status_poller()
        .start(Duration::from_millis(50))
        .unwrap();

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(dashboard.board().llm().await, ServiceState::Running);
    assert_eq!(dashboard.board().sd().await, ServiceState::Stopped);

    handle.stop().await;
}

#[tokio::test]
async fn test_failed_stats_clears_stale_running() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"server_running": true, "sd_running": true})),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stats/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dashboard = client_for(&mock_server, AccessControlMode::Combined).dashboard();
    let poller = dashboard.status_poller();

    poller.poll_once().await;
    assert_eq!(dashboard.board().llm().await, ServiceState::Running);
    assert_eq!(dashboard.board().sd().await, ServiceState::Running);

    poller.poll_once().await;
    assert_eq!(dashboard.board().llm().await, ServiceState::Stopped);
    assert_eq!(dashboard.board().sd().await, ServiceState::Stopped);
}

#[tokio::test]
async fn test_unreachable_backend_marks_stopped() {
    let client = crate::ConsoleClient::builder()
        .base_url("http://127.0.0.1:9/api")
        .build()
        .unwrap();
    let dashboard = client.dashboard();
    dashboard.board().set_llm(ServiceState::Running).await;

    dashboard.status_poller().poll_once().await;
    dashboard.resources().poll_once().await;
    assert_eq!(dashboard.board().llm().await, ServiceState::Stopped);
    assert!(dashboard.resources().sample().await.is_none());
}

#[tokio::test]
async fn test_resource_sample_is_clamped() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cpu": 132.0,
            "ram": 41.5,
            "gpu": -3,
            "server_running": null,
            "sd_running": null
        })))
        .mount(&mock_server)
        .await;

    let dashboard = client_for(&mock_server, AccessControlMode::Combined).dashboard();
    dashboard.resources().poll_once().await;
    let sample = dashboard.resources().sample().await.unwrap();
    assert_eq!(sample.cpu, 100.0);
    assert_eq!(sample.ram, 41.5);
    assert_eq!(sample.gpu, 0.0);
}

#[tokio::test]
async fn test_unmount_stops_all_polling() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/list-llm-instances/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/list-models/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"models": []})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/allowlist/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let dashboard = client_for(&mock_server, AccessControlMode::Combined).dashboard();
    let session = dashboard.mount().await.unwrap();
    settle().await;
    session.unmount().await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let stats_before = hits(&mock_server, "/api/stats/").await;
    let instances_before = hits(&mock_server, "/api/list-llm-instances/").await;
    assert!(stats_before >= 2);
    assert!(instances_before >= 1);

    settle().await;
    assert_eq!(hits(&mock_server, "/api/stats/").await, stats_before);
    assert_eq!(
        hits(&mock_server, "/api/list-llm-instances/").await,
        instances_before
    );
    assert_eq!(hits(&mock_server, "/api/check-sd-webui/").await, 0);
}
