//! Scoped repeating timers.
//!
//! A [`PollHandle`] owns one background task. Cancelling it, by
//! [`PollHandle::stop`] or by dropping the handle, guarantees no further tick
//! starts, and a tick in flight is abandoned before it can write state.

use crate::{ConsoleResult, core::domain::error::ValidationError};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Handle to a running poll loop.
#[derive(Debug)]
pub struct PollHandle {
    name: &'static str,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Spawns a loop that calls `tick` immediately and then every `period`.
    ///
    /// Missed ticks are skipped rather than bunched up. Must be called from
    /// within a tokio runtime.
    ///
    /// # Errors
    /// Returns `ConsoleError::Validation` if `period` is zero.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> ConsoleResult<Self>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if period.is_zero() {
            return Err(ValidationError::Field {
                field: "period".to_string(),
                message: format!("Poll period for '{}' must be greater than 0", name),
            }
            .into());
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::info!(
                poller = name,
                period_ms = period.as_millis() as u64,
                "Poller started"
            );

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        tokio::select! {
                            biased;
                            _ = token.cancelled() => break,
                            _ = tick() => {}
                        }
                    }
                }
            }

            tracing::info!(poller = name, "Poller stopped");
        });

        Ok(Self {
            name,
            cancel,
            task: Some(task),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` until the handle is cancelled or the task ends.
    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled() && self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancels the loop and waits for the task to finish.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(poller = self.name, error = %e, "Poller task ended abnormally");
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
