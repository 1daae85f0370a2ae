//! Composition root for the panels.

use crate::{
    ConsoleResult,
    config::{AccessControlMode, PollingConfig},
    core::{
        domain::model::{app_state::AppState, ip_lists::ServiceKind, log_source::LogSource},
        infrastructure::poller::PollHandle,
    },
    dashboard::application::{
        control_api::ControlApi,
        service::{
            access_control::{AllowedIpsPanel, IpAccessPanel},
            instance_registry::InstanceRegistry,
            log_viewer::LogViewer,
            model_download::ModelDownloadPanel,
            server_control::{LlmServerPanel, StableDiffusionPanel},
            status_poller::{ResourceMonitor, StatusBoard, StatusPoller},
        },
    },
};
use std::sync::Arc;

/// The access-control panel selected by [`AccessControlMode`].
#[derive(Clone)]
pub enum AccessPanel {
    Combined(IpAccessPanel),
    PerService(AllowedIpsPanel),
}

impl AccessPanel {
    pub fn mode(&self) -> AccessControlMode {
        match self {
            AccessPanel::Combined(_) => AccessControlMode::Combined,
            AccessPanel::PerService(_) => AccessControlMode::PerService,
        }
    }

    pub fn as_combined(&self) -> Option<&IpAccessPanel> {
        match self {
            AccessPanel::Combined(panel) => Some(panel),
            AccessPanel::PerService(_) => None,
        }
    }

    pub fn as_per_service(&self) -> Option<&AllowedIpsPanel> {
        match self {
            AccessPanel::PerService(panel) => Some(panel),
            AccessPanel::Combined(_) => None,
        }
    }
}

/// One instance of every panel, sharing one [`AppState`] and one
/// [`StatusBoard`].
#[derive(Clone)]
pub struct Dashboard {
    state: AppState,
    polling: PollingConfig,
    status: StatusPoller,
    resources: ResourceMonitor,
    llm: LlmServerPanel,
    sd: StableDiffusionPanel,
    instances: InstanceRegistry,
    access: AccessPanel,
    downloads: ModelDownloadPanel,
}

impl Dashboard {
    /// Composes every panel around `state`.
    ///
    /// `state` is the session-wide theme and navigation state; every
    /// dashboard built from the same client receives the same one.
    pub fn new(
        api: Arc<dyn ControlApi>,
        state: AppState,
        polling: PollingConfig,
        access_control: AccessControlMode,
    ) -> Self {
        let board = StatusBoard::new();
        let llm_logs = LogViewer::new(api.clone(), LogSource::Llm, polling.llm_logs());
        let sd_logs = LogViewer::new(api.clone(), LogSource::StableDiffusion, polling.sd_logs());
        let access = match access_control {
            AccessControlMode::Combined => AccessPanel::Combined(IpAccessPanel::new(api.clone())),
            AccessControlMode::PerService => {
                AccessPanel::PerService(AllowedIpsPanel::new(api.clone()))
            }
        };

        Self {
            state,
            polling,
            status: StatusPoller::new(api.clone(), board.clone()),
            resources: ResourceMonitor::new(api.clone()),
            llm: LlmServerPanel::new(api.clone(), board.clone(), llm_logs),
            sd: StableDiffusionPanel::new(api.clone(), board, sd_logs),
            instances: InstanceRegistry::new(api.clone(), polling.llm_logs()),
            downloads: ModelDownloadPanel::new(api),
            access,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn board(&self) -> &StatusBoard {
        self.status.board()
    }

    pub fn status_poller(&self) -> &StatusPoller {
        &self.status
    }

    pub fn resources(&self) -> &ResourceMonitor {
        &self.resources
    }

    pub fn llm(&self) -> &LlmServerPanel {
        &self.llm
    }

    pub fn stable_diffusion(&self) -> &StableDiffusionPanel {
        &self.sd
    }

    pub fn instances(&self) -> &InstanceRegistry {
        &self.instances
    }

    pub fn access(&self) -> &AccessPanel {
        &self.access
    }

    pub fn downloads(&self) -> &ModelDownloadPanel {
        &self.downloads
    }

    /// Starts the background pollers and loads the one-shot panel data.
    ///
    /// Log viewers are not opened here; they keep their own handles.
    pub async fn mount(&self) -> ConsoleResult<DashboardSession> {
        let handles = vec![
            self.status.start(self.polling.status())?,
            self.resources.start(self.polling.resources())?,
            self.instances.start_polling(self.polling.instances())?,
            self.sd.start_webui_check(self.polling.sd_webui())?,
        ];
        tracing::info!(pollers = handles.len(), "Dashboard mounted");

        self.llm.refresh_models().await;
        self.instances.refresh_models().await;
        match &self.access {
            AccessPanel::Combined(panel) => panel.refresh().await,
            AccessPanel::PerService(panel) => panel.load(ServiceKind::default()).await,
        }

        Ok(DashboardSession { handles })
    }
}

/// The pollers started by [`Dashboard::mount`].
///
/// Dropping the session cancels them.
#[derive(Debug)]
pub struct DashboardSession {
    handles: Vec<PollHandle>,
}

impl DashboardSession {
    pub fn pollers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handles.iter().map(PollHandle::name)
    }

    pub fn is_active(&self) -> bool {
        self.handles.iter().all(PollHandle::is_active)
    }

    /// Stops every poller and waits for their tasks to end.
    pub async fn unmount(self) {
        for handle in self.handles {
            handle.stop().await;
        }
        tracing::info!("Dashboard unmounted");
    }
}
