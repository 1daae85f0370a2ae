use crate::tests::{client_for, hits};
use crate::{AccessControlMode, ModelType, ServerForm, ServiceState};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

#[tokio::test]
async fn test_start_server_posts_form() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/start-server/"))
        .and(body_json(serde_json::json!({
            "model": "qwen2.5-7b.gguf",
            "host": "0.0.0.0",
            "port": 1337,
            "ngl": 99,
            "template": "chatml",
            "custom_params": ""
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "Server started"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dashboard = client_for(&mock_server, AccessControlMode::Combined).dashboard();
    let llm = dashboard.llm();
    llm.set_form(ServerForm {
        model: "qwen2.5-7b.gguf".to_string(),
        ngl: 99,
        ..ServerForm::default()
    })
    .await;

    llm.start().await.unwrap();
    assert_eq!(llm.state().await, ServiceState::Running);
    assert_eq!(
        llm.status().await.unwrap().message(),
        "Server started successfully!"
    );
}

#[tokio::test]
async fn test_stop_server_failure_without_json() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/stop-server/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let dashboard = client_for(&mock_server, AccessControlMode::Combined).dashboard();
    assert!(dashboard.llm().stop().await.is_err());
    assert_eq!(
        dashboard.llm().status().await.unwrap().message(),
        "Failed to stop server: Server responded with status: 502"
    );
}

#[tokio::test]
async fn test_webui_check_only_while_running() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/start-stable-diffusion/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/check-sd-webui/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"available": true})))
        .mount(&mock_server)
        .await;

    let dashboard = client_for(&mock_server, AccessControlMode::Combined).dashboard();
    let sd = dashboard.stable_diffusion();

    sd.check_webui().await;
    assert_eq!(hits(&mock_server, "/api/check-sd-webui/").await, 0);
    assert!(!sd.webui_available());

    sd.start().await.unwrap();
    sd.check_webui().await;
    assert!(sd.webui_available());
    assert_eq!(hits(&mock_server, "/api/check-sd-webui/").await, 1);
}

#[tokio::test]
async fn test_download_custom_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download-model/"))
        .and(body_json(serde_json::json!({
            "url": "https://example.org/dreamshaper.safetensors",
            "type": "sd"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "Model downloaded successfully",
            "path": "/models/sd/model.safetensors"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dashboard = client_for(&mock_server, AccessControlMode::Combined).dashboard();
    let downloads = dashboard.downloads();
    downloads
        .set_url("https://example.org/dreamshaper.safetensors")
        .await;
    downloads.set_model_type(ModelType::Sd).await;

    let reply = downloads.download().await.unwrap();
    assert_eq!(reply.extra["path"], "/models/sd/model.safetensors");
}
