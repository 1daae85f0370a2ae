//! [`ControlApi`] over HTTP.

use crate::{
    ConsoleResult,
    core::{
        domain::model::{
            ip_lists::{IpListsResponse, ServiceKind},
            llm_instance::RunningInstances,
            log_source::LogSource,
            server_stats::ServerStats,
        },
        infrastructure::api_client::ApiClient,
    },
    dashboard::application::{
        control_api::ControlApi,
        request::{
            access_request::{UpdateAllowedIpsRequest, UpdateIpListRequest},
            download_request::DownloadModelRequest,
            instance_request::{StartInstanceRequest, StopInstanceRequest},
            server_request::StartServerRequest,
        },
        response::{
            action_reply::ActionReply,
            listing_response::{ModelsResponse, WebUiAvailability},
        },
    },
};
use async_trait::async_trait;

#[async_trait]
impl ControlApi for ApiClient {
    async fn stats(&self) -> ConsoleResult<ServerStats> {
        self.get_json("/stats/", &[]).await
    }

    async fn logs(&self, source: LogSource) -> ConsoleResult<String> {
        self.get_text(source.path(), &source.query()).await
    }

    async fn start_server(&self, request: StartServerRequest) -> ConsoleResult<ActionReply> {
        self.post_json("/start-server/", &request).await
    }

    async fn stop_server(&self) -> ConsoleResult<ActionReply> {
        self.post_empty("/stop-server/").await
    }

    async fn start_stable_diffusion(&self) -> ConsoleResult<ActionReply> {
        self.post_empty("/start-stable-diffusion/").await
    }

    async fn stop_stable_diffusion(&self) -> ConsoleResult<ActionReply> {
        self.post_empty("/stop-stable-diffusion/").await
    }

    async fn sd_webui_available(&self) -> ConsoleResult<bool> {
        let body: WebUiAvailability = self.get_json("/check-sd-webui/", &[]).await?;
        Ok(body.available)
    }

    async fn start_llm_instance(
        &self,
        request: StartInstanceRequest,
    ) -> ConsoleResult<ActionReply> {
        self.post_json("/start-llm-instance/", &request).await
    }

    async fn stop_llm_instance(
        &self,
        request: StopInstanceRequest,
    ) -> ConsoleResult<ActionReply> {
        self.post_json("/stop-llm-instance/", &request).await
    }

    async fn list_llm_instances(&self) -> ConsoleResult<RunningInstances> {
        self.get_json("/list-llm-instances/", &[]).await
    }

    async fn list_models(&self) -> ConsoleResult<Vec<String>> {
        let body: ModelsResponse = self.get_json("/list-models/", &[]).await?;
        Ok(body.models)
    }

    async fn download_model(&self, request: DownloadModelRequest) -> ConsoleResult<ActionReply> {
        self.post_json("/download-model/", &request).await
    }

    async fn ip_lists(&self) -> ConsoleResult<IpListsResponse> {
        self.get_json("/allowlist/", &[]).await
    }

    async fn update_ip_list(&self, request: UpdateIpListRequest) -> ConsoleResult<ActionReply> {
        self.post_json(request.kind.update_path(), &request).await
    }

    async fn allowed_ips(&self, service: ServiceKind) -> ConsoleResult<String> {
        self.get_text("/get-allowed-ips/", &[("service", service.to_string())])
            .await
    }

    async fn update_allowed_ips(
        &self,
        request: UpdateAllowedIpsRequest,
    ) -> ConsoleResult<ActionReply> {
        self.post_json("/update-allowed-ips/", &request).await
    }

    async fn restart_proxy(&self) -> ConsoleResult<ActionReply> {
        self.post_empty("/restart-nginx/").await
    }
}
