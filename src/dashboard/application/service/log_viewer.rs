//! Pollable plain-text log panes.

use crate::{
    ConsoleResult,
    core::{
        domain::model::log_source::{EMPTY_LOG_PLACEHOLDER, LogSource},
        infrastructure::poller::PollHandle,
    },
    dashboard::application::control_api::ControlApi,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// What a tick needs. Kept apart from the handle so the running task does
/// not keep its own handle alive.
#[derive(Clone)]
struct LogFetcher {
    api: Arc<dyn ControlApi>,
    source: LogSource,
    buffer: Arc<RwLock<String>>,
}

impl LogFetcher {
    async fn fetch_once(&self) {
        let text = match self.api.logs(self.source).await {
            Ok(body) if body.is_empty() => EMPTY_LOG_PLACEHOLDER.to_string(),
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(source = %self.source, error = %e, "Log fetch failed");
                self.source.error_placeholder()
            }
        };
        *self.buffer.write().await = text;
    }
}

/// A log pane that polls its source while open.
///
/// Clones share the buffer and the open/closed state.
#[derive(Clone)]
pub struct LogViewer {
    fetcher: LogFetcher,
    period: Duration,
    handle: Arc<Mutex<Option<PollHandle>>>,
}

impl LogViewer {
    pub fn new(api: Arc<dyn ControlApi>, source: LogSource, period: Duration) -> Self {
        Self {
            fetcher: LogFetcher {
                api,
                source,
                buffer: Arc::new(RwLock::new(String::new())),
            },
            period,
            handle: Arc::new(Mutex::new(None)),
        }
    }

    pub fn source(&self) -> LogSource {
        self.fetcher.source
    }

    /// Current text, kept verbatim.
    pub async fn text(&self) -> String {
        self.fetcher.buffer.read().await.clone()
    }

    pub async fn is_open(&self) -> bool {
        self.handle
            .lock()
            .await
            .as_ref()
            .is_some_and(PollHandle::is_active)
    }

    /// Starts polling. Opening an open viewer does nothing.
    pub async fn open(&self) -> ConsoleResult<()> {
        let mut handle = self.handle.lock().await;
        if handle.as_ref().is_some_and(PollHandle::is_active) {
            return Ok(());
        }

        let fetcher = self.fetcher.clone();
        *handle = Some(PollHandle::spawn("logs", self.period, move || {
            let fetcher = fetcher.clone();
            async move { fetcher.fetch_once().await }
        })?);
        Ok(())
    }

    /// Stops polling and waits until no tick can write the buffer.
    pub async fn close(&self) {
        let handle = self.handle.lock().await.take();
        if let Some(handle) = handle {
            handle.stop().await;
        }
    }

    /// Opens a closed viewer or closes an open one. Returns whether it is
    /// open afterwards.
    pub async fn toggle(&self) -> ConsoleResult<bool> {
        if self.is_open().await {
            self.close().await;
            Ok(false)
        } else {
            self.open().await?;
            Ok(true)
        }
    }

    /// Runs one fetch outside the poll loop.
    pub async fn refresh(&self) {
        self.fetcher.fetch_once().await;
    }

    pub async fn clear(&self) {
        self.fetcher.buffer.write().await.clear();
    }
}
