//! HTTP-level tests against `wiremock` servers.

mod resources {
    mod access_tests;
    mod instance_tests;
    mod log_tests;
    mod server_tests;
    mod status_tests;
}

use crate::{AccessControlMode, ConsoleClient, PollingConfig};
use std::time::Duration;
use wiremock::MockServer;

/// Poll periods short enough for real-time tests.
pub(crate) fn fast_polling() -> PollingConfig {
    PollingConfig {
        status_ms: 50,
        resources_ms: 50,
        llm_logs_ms: 50,
        sd_logs_ms: 50,
        instances_ms: 50,
        sd_webui_ms: 50,
    }
}

pub(crate) fn client_for(server: &MockServer, mode: AccessControlMode) -> ConsoleClient {
    ConsoleClient::builder()
        .base_url(format!("{}/api", server.uri()))
        .polling(fast_polling())
        .rate_limit(1000, 1000)
        .access_control(mode)
        .build()
        .unwrap()
}

/// Number of requests the server has seen for `path`.
pub(crate) async fn hits(server: &MockServer, path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == path)
        .count()
}

/// Waits long enough for several poll periods to elapse.
pub(crate) async fn settle() {
    tokio::time::sleep(Duration::from_millis(200)).await;
}
