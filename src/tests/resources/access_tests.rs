use crate::tests::{client_for, hits};
use crate::{AccessControlMode, ListKind, ServiceKind};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path, query_param},
};

async fn mount_lists(server: &MockServer, allow: &str, block: &str) {
    Mock::given(method("GET"))
        .and(path("/api/allowlist/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"allowlist": allow, "blocklist": block})),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_rejected_update_keeps_list_and_shows_detail() {
    let mock_server = MockServer::start().await;
    mount_lists(&mock_server, "0.0.0.0", "").await;
    Mock::given(method("POST"))
        .and(path("/api/update-allowlist/"))
        .and(body_json(serde_json::json!({"allowlist": "10.0.0.1"})))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({"detail": "bad format"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dashboard = client_for(&mock_server, AccessControlMode::Combined).dashboard();
    let panel = dashboard.access().as_combined().unwrap();
    panel.refresh().await;

    assert!(panel.add("10.0.0.1", ListKind::Allow).await.is_err());
    let status = panel.status().await.unwrap();
    assert!(!status.is_success());
    assert!(status.message().contains("bad format"));
    assert!(panel.lists().await.allowed.is_empty());
    assert_eq!(hits(&mock_server, "/api/allowlist/").await, 1);
}

#[tokio::test]
async fn test_clearing_lists_uses_wire_sentinels() {
    let mock_server = MockServer::start().await;
    mount_lists(&mock_server, "10.0.0.1", "6.6.6.6").await;
    Mock::given(method("POST"))
        .and(path("/api/update-allowlist/"))
        .and(body_json(serde_json::json!({"allowlist": "0.0.0.0"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/update-blocklist/"))
        .and(body_json(serde_json::json!({"blocklist": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dashboard = client_for(&mock_server, AccessControlMode::Combined).dashboard();
    let panel = dashboard.access().as_combined().unwrap();
    panel.refresh().await;

    panel.remove("10.0.0.1", ListKind::Allow).await.unwrap();
    panel.remove("6.6.6.6", ListKind::Block).await.unwrap();
}

#[tokio::test]
async fn test_duplicate_add_sends_nothing() {
    let mock_server = MockServer::start().await;
    mount_lists(&mock_server, "", "1.2.3.4").await;

    let dashboard = client_for(&mock_server, AccessControlMode::Combined).dashboard();
    let panel = dashboard.access().as_combined().unwrap();
    panel.refresh().await;

    assert!(panel.add("1.2.3.4", ListKind::Block).await.is_err());
    assert_eq!(hits(&mock_server, "/api/update-blocklist/").await, 0);
    assert_eq!(
        panel.status().await.unwrap().message(),
        "IP 1.2.3.4 is already in the blocked list."
    );
}

#[tokio::test]
async fn test_per_service_round_trip() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get-allowed-ips/"))
        .and(query_param("service", "frontend"))
        .respond_with(ResponseTemplate::new(200).set_body_string("192.168.0.0/16\n"))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/update-allowed-ips/"))
        .and(body_json(serde_json::json!({
            "service": "frontend",
            "content": "192.168.0.0/16\n10.1.1.1\n"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/restart-nginx/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dashboard = client_for(&mock_server, AccessControlMode::PerService).dashboard();
    let panel = dashboard.access().as_per_service().unwrap();

    panel.load(ServiceKind::Frontend).await;
    let mut content = panel.content().await;
    content.push_str("10.1.1.1\n");
    panel.set_content(content).await;

    panel.save().await.unwrap();
    assert_eq!(
        panel.status().await.unwrap().message(),
        "Allowlist for frontend updated. Restart Nginx to apply."
    );

    panel.restart_proxy().await.unwrap();
    assert_eq!(
        panel.status().await.unwrap().message(),
        "Nginx restarted successfully."
    );
}
