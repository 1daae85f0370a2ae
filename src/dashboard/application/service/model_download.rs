use crate::{
    ConsoleResult, ValidationError,
    core::domain::model::model_catalog::{ModelType, PresetModel, find_preset},
    dashboard::application::{
        control_api::ControlApi,
        request::download_request::DownloadModelRequest,
        response::action_reply::ActionReply,
        service::action_dispatcher::{ActionDispatcher, ActionMessages, OperationStatus},
    },
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Download form state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadForm {
    pub preset: Option<&'static PresetModel>,
    pub url: String,
    pub filename: Option<String>,
    pub model_type: ModelType,
}

/// Fetches a model file onto the backend from a preset or a custom URL.
#[derive(Clone)]
pub struct ModelDownloadPanel {
    api: Arc<dyn ControlApi>,
    form: Arc<RwLock<DownloadForm>>,
    action: ActionDispatcher,
}

impl ModelDownloadPanel {
    pub fn new(api: Arc<dyn ControlApi>) -> Self {
        Self {
            api,
            form: Arc::new(RwLock::new(DownloadForm::default())),
            action: ActionDispatcher::new("download-model"),
        }
    }

    pub async fn form(&self) -> DownloadForm {
        self.form.read().await.clone()
    }

    pub async fn status(&self) -> Option<OperationStatus> {
        self.action.status().await
    }

    pub fn action(&self) -> &ActionDispatcher {
        &self.action
    }

    /// Picks a catalog entry and copies its URL and filename.
    pub async fn select_preset(&self, name: &str) -> ConsoleResult<()> {
        let preset = find_preset(name).ok_or_else(|| ValidationError::Field {
            field: "preset".to_string(),
            message: format!("Unknown preset model: {}", name),
        })?;
        let mut form = self.form.write().await;
        form.preset = Some(preset);
        form.url = preset.url.to_string();
        form.filename = Some(preset.filename.to_string());
        Ok(())
    }

    /// Switches to a custom URL, dropping any selected preset.
    pub async fn set_url(&self, url: impl Into<String>) {
        let mut form = self.form.write().await;
        if form.preset.take().is_some() {
            form.filename = None;
        }
        form.url = url.into();
    }

    pub async fn set_filename(&self, filename: Option<String>) {
        self.form.write().await.filename = filename.filter(|f| !f.trim().is_empty());
    }

    pub async fn set_model_type(&self, model_type: ModelType) {
        self.form.write().await.model_type = model_type;
    }

    pub async fn download(&self) -> ConsoleResult<ActionReply> {
        let form = self.form().await;
        // URLs are not checked client-side; the backend reports bad ones.
        let url = form.url.trim().to_string();

        let saved_as = form.filename.clone().unwrap_or_else(|| "model".to_string());
        let messages = ActionMessages::new(format!(
            "Model downloaded successfully as \"{}\"!",
            saved_as
        ))
        .on_failure_fixed("Failed to download model. Please try again.")
        .on_network("Network error occurred. Please check your connection.");

        let request = DownloadModelRequest {
            url,
            filename: form.filename,
            model_type: form.model_type,
        };
        self.action
            .dispatch(messages, self.api.download_model(request))
            .await
    }
}
