use crate::tests::{client_for, hits};
use crate::{AccessControlMode, InstanceForm};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

fn listing(ports: &[u16]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for port in ports {
        map.insert(
            port.to_string(),
            serde_json::json!({
                "config": {
                    "model": "qwen2.5-3b.gguf",
                    "external_port": port,
                    "host": "0.0.0.0",
                    "ngl": 30,
                    "template": "chatml",
                    "custom_params": ""
                },
                "log_file": format!("/app/server_logs_{}.txt", port + 1),
                "status": "running",
                "pid": 321,
                "internal_port": port + 1
            }),
        );
    }
    serde_json::Value::Object(map)
}

#[tokio::test]
async fn test_stop_refreshes_exactly_once() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/stop-llm-instance/"))
        .and(body_json(serde_json::json!({"external_port": 1339})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "LLM instance stopped"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/list-llm-instances/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(&[1337])))
        .mount(&mock_server)
        .await;

    let registry = client_for(&mock_server, AccessControlMode::Combined)
        .dashboard()
        .instances()
        .clone();

    let reply = registry.stop(1339).await.unwrap();
    assert_eq!(reply.status.as_deref(), Some("LLM instance stopped"));
    assert_eq!(hits(&mock_server, "/api/list-llm-instances/").await, 1);
    assert!(registry.instance(1339).await.is_none());
    assert!(registry.instance(1337).await.is_some());
    assert_eq!(
        registry.status().await.unwrap().message(),
        "Instance on port 1339 stopped successfully!"
    );
}

#[tokio::test]
async fn test_start_on_used_port_sends_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/list-llm-instances/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(&[1337, 1339])))
        .mount(&mock_server)
        .await;

    let registry = client_for(&mock_server, AccessControlMode::Combined)
        .dashboard()
        .instances()
        .clone();
    registry.refresh().await;
    registry
        .set_form(InstanceForm {
            model: "qwen2.5-3b.gguf".to_string(),
            external_port: 1339,
            ..InstanceForm::default()
        })
        .await;

    assert!(registry.start().await.is_err());
    assert_eq!(hits(&mock_server, "/api/start-llm-instance/").await, 0);
    assert_eq!(
        registry.status().await.unwrap().message(),
        "Port 1339 is already in use."
    );
}

#[tokio::test]
async fn test_start_failure_shows_detail() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/start-llm-instance/"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"detail": "Model file not found"})),
        )
        .mount(&mock_server)
        .await;

    let registry = client_for(&mock_server, AccessControlMode::Combined)
        .dashboard()
        .instances()
        .clone();
    registry
        .set_form(InstanceForm {
            model: "missing.gguf".to_string(),
            ..InstanceForm::default()
        })
        .await;

    assert!(registry.start().await.is_err());
    assert_eq!(
        registry.status().await.unwrap().message(),
        "Failed to start instance: Model file not found"
    );
    assert_eq!(hits(&mock_server, "/api/list-llm-instances/").await, 0);
}
