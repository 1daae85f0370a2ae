//! Run-state and host-utilization polling over `/stats/`.

use crate::{
    ConsoleResult,
    core::{
        domain::model::server_stats::{ResourceSample, ServiceState},
        infrastructure::poller::PollHandle,
    },
    dashboard::application::control_api::ControlApi,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BoardState {
    llm: ServiceState,
    sd: ServiceState,
}

/// Shared run-state of the LLM and Stable Diffusion services.
///
/// The status poller writes it on every tick, and panels write an
/// optimistic value after a successful start or stop.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    inner: Arc<RwLock<BoardState>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn llm(&self) -> ServiceState {
        self.inner.read().await.llm
    }

    pub async fn sd(&self) -> ServiceState {
        self.inner.read().await.sd
    }

    pub async fn set_llm(&self, state: ServiceState) {
        self.inner.write().await.llm = state;
    }

    pub async fn set_sd(&self, state: ServiceState) {
        self.inner.write().await.sd = state;
    }

    async fn set_both(&self, llm: ServiceState, sd: ServiceState) {
        *self.inner.write().await = BoardState { llm, sd };
    }
}

/// Keeps a [`StatusBoard`] in sync with the backend.
#[derive(Clone)]
pub struct StatusPoller {
    api: Arc<dyn ControlApi>,
    board: StatusBoard,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn ControlApi>, board: StatusBoard) -> Self {
        Self { api, board }
    }

    pub fn board(&self) -> &StatusBoard {
        &self.board
    }

    /// Runs one poll. Any failure marks both services stopped.
    pub async fn poll_once(&self) {
        match self.api.stats().await {
            Ok(stats) => {
                self.board
                    .set_both(
                        ServiceState::from_running(stats.llm_running()),
                        ServiceState::from_running(stats.sd_running),
                    )
                    .await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Status poll failed");
                self.board
                    .set_both(ServiceState::Stopped, ServiceState::Stopped)
                    .await;
            }
        }
    }

    pub fn start(&self, period: Duration) -> ConsoleResult<PollHandle> {
        let poller = self.clone();
        PollHandle::spawn("status", period, move || {
            let poller = poller.clone();
            async move { poller.poll_once().await }
        })
    }
}

/// Latest CPU, RAM and GPU utilization.
#[derive(Clone)]
pub struct ResourceMonitor {
    api: Arc<dyn ControlApi>,
    sample: Arc<RwLock<Option<ResourceSample>>>,
}

impl ResourceMonitor {
    pub fn new(api: Arc<dyn ControlApi>) -> Self {
        Self {
            api,
            sample: Arc::new(RwLock::new(None)),
        }
    }

    /// `None` until the first successful poll and after any failed one.
    pub async fn sample(&self) -> Option<ResourceSample> {
        *self.sample.read().await
    }

    pub async fn poll_once(&self) {
        let sample = match self.api.stats().await {
            Ok(stats) => Some(stats.sample()),
            Err(e) => {
                tracing::warn!(error = %e, "Resource poll failed");
                None
            }
        };
        *self.sample.write().await = sample;
    }

    pub fn start(&self, period: Duration) -> ConsoleResult<PollHandle> {
        let monitor = self.clone();
        PollHandle::spawn("resources", period, move || {
            let monitor = monitor.clone();
            async move { monitor.poll_once().await }
        })
    }
}
