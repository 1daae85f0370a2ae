//! The typed surface of the backend's `/api` routes.
//!
//! Panels talk to the backend only through this trait so that tests can
//! substitute a mock and count calls.

use crate::{
    ConsoleResult,
    core::domain::model::{
        ip_lists::{IpListsResponse, ServiceKind},
        llm_instance::RunningInstances,
        log_source::LogSource,
        server_stats::ServerStats,
    },
    dashboard::application::{
        request::{
            access_request::{UpdateAllowedIpsRequest, UpdateIpListRequest},
            download_request::DownloadModelRequest,
            instance_request::{StartInstanceRequest, StopInstanceRequest},
            server_request::StartServerRequest,
        },
        response::action_reply::ActionReply,
    },
};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ControlApi: Send + Sync {
    /// `GET /stats/`
    async fn stats(&self) -> ConsoleResult<ServerStats>;

    /// `GET /logs/`, `/sd-logs/` or `/llm-logs/?external_port=N` as raw text.
    async fn logs(&self, source: LogSource) -> ConsoleResult<String>;

    /// `POST /start-server/`
    async fn start_server(&self, request: StartServerRequest) -> ConsoleResult<ActionReply>;

    /// `POST /stop-server/`
    async fn stop_server(&self) -> ConsoleResult<ActionReply>;

    /// `POST /start-stable-diffusion/`
    async fn start_stable_diffusion(&self) -> ConsoleResult<ActionReply>;

    /// `POST /stop-stable-diffusion/`
    async fn stop_stable_diffusion(&self) -> ConsoleResult<ActionReply>;

    /// `GET /check-sd-webui/`
    async fn sd_webui_available(&self) -> ConsoleResult<bool>;

    /// `POST /start-llm-instance/`
    async fn start_llm_instance(
        &self,
        request: StartInstanceRequest,
    ) -> ConsoleResult<ActionReply>;

    /// `POST /stop-llm-instance/`
    async fn stop_llm_instance(&self, request: StopInstanceRequest)
    -> ConsoleResult<ActionReply>;

    /// `GET /list-llm-instances/`
    async fn list_llm_instances(&self) -> ConsoleResult<RunningInstances>;

    /// `GET /list-models/`
    async fn list_models(&self) -> ConsoleResult<Vec<String>>;

    /// `POST /download-model/`
    async fn download_model(&self, request: DownloadModelRequest) -> ConsoleResult<ActionReply>;

    /// `GET /allowlist/`
    async fn ip_lists(&self) -> ConsoleResult<IpListsResponse>;

    /// `POST /update-allowlist/` or `/update-blocklist/`
    async fn update_ip_list(&self, request: UpdateIpListRequest) -> ConsoleResult<ActionReply>;

    /// `GET /get-allowed-ips/?service=S` as raw text.
    async fn allowed_ips(&self, service: ServiceKind) -> ConsoleResult<String>;

    /// `POST /update-allowed-ips/`
    async fn update_allowed_ips(
        &self,
        request: UpdateAllowedIpsRequest,
    ) -> ConsoleResult<ActionReply>;

    /// `POST /restart-nginx/`
    async fn restart_proxy(&self) -> ConsoleResult<ActionReply>;
}
