//! Start/stop panels for the single LLM server and Stable Diffusion.

use crate::{
    ConsoleResult,
    core::{
        domain::model::server_stats::ServiceState, infrastructure::poller::PollHandle,
    },
    dashboard::application::{
        control_api::ControlApi,
        request::server_request::StartServerRequest,
        response::action_reply::ActionReply,
        service::{
            action_dispatcher::{ActionDispatcher, ActionMessages, OperationStatus},
            log_viewer::LogViewer,
            status_poller::StatusBoard,
        },
    },
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Model name sent when the field is left blank.
pub const DEFAULT_MODEL: &str = "model";

/// Launch form of the single-instance LLM server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerForm {
    pub model: String,
    pub host: String,
    pub port: u16,
    pub ngl: u32,
    pub template: String,
    pub custom_params: String,
}

impl Default for ServerForm {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 1337,
            ngl: 30,
            template: "chatml".to_string(),
            custom_params: String::new(),
        }
    }
}

impl ServerForm {
    fn to_request(&self) -> StartServerRequest {
        let model = self.model.trim();
        StartServerRequest {
            model: if model.is_empty() {
                DEFAULT_MODEL.to_string()
            } else {
                model.to_string()
            },
            host: self.host.clone(),
            port: self.port,
            ngl: self.ngl,
            template: self.template.clone(),
            custom_params: self.custom_params.trim().to_string(),
        }
    }
}

/// Controls the single-instance LLM server.
#[derive(Clone)]
pub struct LlmServerPanel {
    api: Arc<dyn ControlApi>,
    board: StatusBoard,
    logs: LogViewer,
    form: Arc<RwLock<ServerForm>>,
    models: Arc<RwLock<Vec<String>>>,
    start_action: ActionDispatcher,
    stop_action: ActionDispatcher,
}

impl LlmServerPanel {
    pub fn new(api: Arc<dyn ControlApi>, board: StatusBoard, logs: LogViewer) -> Self {
        let start_action = ActionDispatcher::new("start-server");
        Self {
            api,
            board,
            logs,
            form: Arc::new(RwLock::new(ServerForm::default())),
            models: Arc::new(RwLock::new(Vec::new())),
            start_action: start_action.clone(),
            stop_action: start_action.sharing_status("stop-server"),
        }
    }

    pub async fn form(&self) -> ServerForm {
        self.form.read().await.clone()
    }

    pub async fn set_form(&self, form: ServerForm) {
        *self.form.write().await = form;
    }

    pub async fn state(&self) -> ServiceState {
        self.board.llm().await
    }

    pub fn logs(&self) -> &LogViewer {
        &self.logs
    }

    pub async fn models(&self) -> Vec<String> {
        self.models.read().await.clone()
    }

    /// Status of whichever of start or stop ran last.
    pub async fn status(&self) -> Option<OperationStatus> {
        self.start_action.status().await
    }

    pub fn start_action(&self) -> &ActionDispatcher {
        &self.start_action
    }

    pub fn stop_action(&self) -> &ActionDispatcher {
        &self.stop_action
    }

    pub async fn start(&self) -> ConsoleResult<ActionReply> {
        let request = self.form.read().await.to_request();
        let messages = ActionMessages::new("Server started successfully!")
            .on_failure("Failed to start server");

        let reply = self
            .start_action
            .dispatch(messages, self.api.start_server(request))
            .await?;
        self.board.set_llm(ServiceState::Running).await;
        Ok(reply)
    }

    pub async fn stop(&self) -> ConsoleResult<ActionReply> {
        let messages = ActionMessages::new("Server stopped successfully!")
            .on_failure("Failed to stop server");

        let reply = self
            .stop_action
            .dispatch(messages, self.api.stop_server())
            .await?;
        self.board.set_llm(ServiceState::Stopped).await;
        self.logs.clear().await;
        Ok(reply)
    }

    /// Reloads the model list. On failure the list is emptied.
    pub async fn refresh_models(&self) {
        let models = match self.api.list_models().await {
            Ok(models) => models,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch available models");
                Vec::new()
            }
        };
        *self.models.write().await = models;
    }
}

/// Controls the Stable Diffusion server and tracks web-UI availability.
#[derive(Clone)]
pub struct StableDiffusionPanel {
    api: Arc<dyn ControlApi>,
    board: StatusBoard,
    logs: LogViewer,
    webui_available: Arc<AtomicBool>,
    start_action: ActionDispatcher,
    stop_action: ActionDispatcher,
}

impl StableDiffusionPanel {
    pub fn new(api: Arc<dyn ControlApi>, board: StatusBoard, logs: LogViewer) -> Self {
        let start_action = ActionDispatcher::new("start-stable-diffusion");
        Self {
            api,
            board,
            logs,
            webui_available: Arc::new(AtomicBool::new(false)),
            stop_action: start_action.sharing_status("stop-stable-diffusion"),
            start_action,
        }
    }

    pub async fn status(&self) -> Option<OperationStatus> {
        self.start_action.status().await
    }

    pub async fn state(&self) -> ServiceState {
        self.board.sd().await
    }

    pub fn logs(&self) -> &LogViewer {
        &self.logs
    }

    pub fn webui_available(&self) -> bool {
        self.webui_available.load(Ordering::Acquire)
    }

    pub fn start_action(&self) -> &ActionDispatcher {
        &self.start_action
    }

    pub fn stop_action(&self) -> &ActionDispatcher {
        &self.stop_action
    }

    pub async fn start(&self) -> ConsoleResult<ActionReply> {
        let messages = ActionMessages::new(
            "Stable Diffusion started successfully! WebUI will be available in a moment.",
        )
        .on_failure("Failed to start Stable Diffusion");

        let reply = self
            .start_action
            .dispatch(messages, self.api.start_stable_diffusion())
            .await?;
        self.board.set_sd(ServiceState::Running).await;
        Ok(reply)
    }

    pub async fn stop(&self) -> ConsoleResult<ActionReply> {
        let messages = ActionMessages::new("Stable Diffusion stopped successfully!")
            .on_failure("Failed to stop Stable Diffusion");

        let reply = self
            .stop_action
            .dispatch(messages, self.api.stop_stable_diffusion())
            .await?;
        self.board.set_sd(ServiceState::Stopped).await;
        self.webui_available.store(false, Ordering::Release);
        Ok(reply)
    }

    /// Checks `/check-sd-webui/`, but only while the server is running.
    pub async fn check_webui(&self) {
        let available = if self.board.sd().await.is_running() {
            match self.api.sd_webui_available().await {
                Ok(available) => available,
                Err(e) => {
                    tracing::warn!(error = %e, "Web UI availability check failed");
                    false
                }
            }
        } else {
            false
        };
        self.webui_available.store(available, Ordering::Release);
    }

    pub fn start_webui_check(&self, period: Duration) -> ConsoleResult<PollHandle> {
        let panel = self.clone();
        PollHandle::spawn("sd-webui", period, move || {
            let panel = panel.clone();
            async move { panel.check_webui().await }
        })
    }
}
