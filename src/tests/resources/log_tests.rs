use crate::tests::{client_for, hits, settle};
use crate::{AccessControlMode, ConsoleClient, LogSource, LogViewer};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn viewer(client: &ConsoleClient, source: LogSource) -> LogViewer {
    LogViewer::new(client.api(), source, Duration::from_millis(50))
}

#[tokio::test]
async fn test_closed_viewer_stops_fetching() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logs/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("llama.cpp ready\n"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, AccessControlMode::Combined);
    let logs = viewer(&client, LogSource::Llm);

    assert!(logs.toggle().await.unwrap());
    settle().await;
    assert_eq!(logs.text().await, "llama.cpp ready\n");

    assert!(!logs.toggle().await.unwrap());
    tokio::time::sleep(Duration::from_millis(20)).await;
    let after_close = hits(&mock_server, "/api/logs/").await;
    assert!(after_close >= 2);

    settle().await;
    assert_eq!(hits(&mock_server, "/api/logs/").await, after_close);
}

#[tokio::test]
async fn test_sd_log_placeholders() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sd-logs/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sd-logs/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, AccessControlMode::Combined);
    let logs = viewer(&client, LogSource::StableDiffusion);

    logs.refresh().await;
    assert_eq!(logs.text().await, "No logs available.");
    logs.refresh().await;
    assert_eq!(logs.text().await, "Error fetching Stable Diffusion logs.");
}

#[tokio::test]
async fn test_instance_logs_use_port_query() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/llm-logs/"))
        .and(query_param("external_port", "1343"))
        .respond_with(ResponseTemplate::new(200).set_body_string("slot 0 idle"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, AccessControlMode::Combined);
    let logs = viewer(
        &client,
        LogSource::Instance(crate::ExternalPort::new(1343).unwrap()),
    );

    logs.refresh().await;
    assert_eq!(logs.text().await, "slot 0 idle");
}
