pub mod config;
pub mod core;
pub mod dashboard;
pub mod logging;

pub use crate::config::{
    AccessControlMode, ApiConfig, ConsoleConfig, LogFormat, LoggingConfig, PollingConfig,
    RateLimitConfig,
};
pub use crate::core::domain::error::{ConsoleError, ConsoleResult, ValidationError};
pub use crate::core::domain::model::{
    app_state::{AppState, Tab, Theme, ThemeState},
    ip_lists::{AccessMode, AccessSummary, IpLists, ListKind, ServiceKind},
    llm_instance::{InstanceConfig, InstanceRecord, RunningInstances},
    log_source::LogSource,
    model_catalog::{ModelType, PRESET_MODELS, PresetModel},
    server_stats::{ResourceSample, ServerStats, ServiceState, UsageLevel},
};
pub use crate::core::domain::value_object::{
    AVAILABLE_EXTERNAL_PORTS, ApiBaseUrl, ExternalPort, Ipv4Address,
};
pub use crate::core::infrastructure::{api_client::ApiClient, poller::PollHandle};
pub use crate::dashboard::application::{
    control_api::ControlApi,
    service::{
        access_control::{AllowedIpsPanel, IpAccessPanel},
        action_dispatcher::{ActionDispatcher, ActionMessages, OperationStatus},
        dashboard::{AccessPanel, Dashboard, DashboardSession},
        instance_registry::{InstanceForm, InstanceRegistry},
        log_viewer::LogViewer,
        model_download::{DownloadForm, ModelDownloadPanel},
        server_control::{LlmServerPanel, ServerForm, StableDiffusionPanel},
        status_poller::{ResourceMonitor, StatusBoard, StatusPoller},
    },
};

use std::sync::Arc;

/// A client for the control API of a self-hosted LLM and Stable Diffusion
/// stack.
///
/// The client owns the HTTP connection settings and poll periods. Panels are
/// obtained through [`ConsoleClient::dashboard`].
///
/// # Examples
///
/// ```no_run
/// use velesio_console::{ConsoleClient, ConsoleResult};
///
/// #[tokio::main]
/// async fn main() -> ConsoleResult<()> {
///     let client = ConsoleClient::builder()
///         .base_url("https://gpu-box.local/api")
///         .accept_invalid_certs(true)
///         .build()?;
///
///     let dashboard = client.dashboard();
///     let session = dashboard.mount().await?;
///
///     dashboard.llm().start().await?;
///     println!("LLM: {}", dashboard.llm().state().await);
///
///     session.unmount().await;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ConsoleClient {
    api: Arc<dyn ControlApi>,
    config: ConsoleConfig,
    state: AppState,
}

/// Builder for ConsoleClient configuration
#[derive(Debug, Default)]
pub struct ConsoleClientBuilder {
    config: ConsoleConfig,
}

impl ConsoleClientBuilder {
    /// Starts from a loaded configuration. Later builder calls override it.
    pub fn from_config(config: ConsoleConfig) -> Self {
        Self { config }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.api.base_url = base_url.into();
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.api.accept_invalid_certs = accept;
        self
    }

    pub fn rate_limit(mut self, requests_per_second: u32, burst_size: u32) -> Self {
        self.config.api.rate_limit = Some(RateLimitConfig {
            requests_per_second,
            burst_size,
        });
        self
    }

    pub fn polling(mut self, polling: PollingConfig) -> Self {
        self.config.polling = polling;
        self
    }

    pub fn access_control(mut self, mode: AccessControlMode) -> Self {
        self.config.access_control = mode;
        self
    }

    /// Validates the configuration and builds the HTTP client.
    ///
    /// # Errors
    /// Returns `ConsoleError::Validation` for a bad base URL, poll period or
    /// rate limit.
    pub fn build(self) -> ConsoleResult<ConsoleClient> {
        self.config.validate()?;
        let api = ApiClient::new(&self.config.api)?;
        tracing::debug!(base_url = %api.base_url(), "Console client built");

        Ok(ConsoleClient::with_api(Arc::new(api), self.config))
    }
}

impl ConsoleClient {
    /// Creates a new builder for ConsoleClient configuration
    pub fn builder() -> ConsoleClientBuilder {
        ConsoleClientBuilder::default()
    }

    /// Wraps an existing [`ControlApi`] implementation.
    pub fn with_api(api: Arc<dyn ControlApi>, config: ConsoleConfig) -> Self {
        Self {
            api,
            config,
            state: AppState::default(),
        }
    }

    pub fn api(&self) -> Arc<dyn ControlApi> {
        self.api.clone()
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Theme and navigation state shared by every dashboard of this client.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Returns a fresh set of panels built around the client's app state.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(
            self.api.clone(),
            self.state.clone(),
            self.config.polling,
            self.config.access_control,
        )
    }

    /// Fetches `/stats/` once.
    pub async fn stats(&self) -> ConsoleResult<ServerStats> {
        self.api.stats().await
    }
}

#[cfg(test)]
mod tests;
