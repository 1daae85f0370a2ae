//! Single-flight execution of user actions with a transient status line.

use crate::{ConsoleError, ConsoleResult, ValidationError};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

const DEFAULT_NETWORK_MESSAGE: &str = "Network error occurred. Please try again.";

/// Outcome shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    Success(String),
    Error(String),
}

impl OperationStatus {
    pub fn message(&self) -> &str {
        match self {
            OperationStatus::Success(m) | OperationStatus::Error(m) => m,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationStatus::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FailureText {
    /// Rendered as `"{prefix}: {detail}"`.
    Prefixed(String),
    /// Rendered verbatim, backend detail is dropped.
    Fixed(String),
}

/// The three texts an action can end with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMessages {
    success: String,
    failure: FailureText,
    network: String,
}

impl ActionMessages {
    pub fn new(success: impl Into<String>) -> Self {
        Self {
            success: success.into(),
            failure: FailureText::Prefixed("Request failed".to_string()),
            network: DEFAULT_NETWORK_MESSAGE.to_string(),
        }
    }

    /// Backend errors render as `"{prefix}: {detail}"`.
    pub fn on_failure(mut self, prefix: impl Into<String>) -> Self {
        self.failure = FailureText::Prefixed(prefix.into());
        self
    }

    /// Backend errors render as `message`, ignoring the detail.
    pub fn on_failure_fixed(mut self, message: impl Into<String>) -> Self {
        self.failure = FailureText::Fixed(message.into());
        self
    }

    pub fn on_network(mut self, message: impl Into<String>) -> Self {
        self.network = message.into();
        self
    }

    /// Maps an error to the text shown to the user.
    pub fn failure_text(&self, error: &ConsoleError) -> String {
        match error {
            ConsoleError::Connection(_) => self.network.clone(),
            ConsoleError::Validation {
                source: ValidationError::ConstraintViolation(message),
            } => message.clone(),
            ConsoleError::Api { .. } => match &self.failure {
                FailureText::Prefixed(prefix) => {
                    format!("{}: {}", prefix, error.detail_or_generic())
                }
                FailureText::Fixed(message) => message.clone(),
            },
            other => other.to_string(),
        }
    }
}

/// Clears the busy flag when the action ends, including when its future is
/// dropped mid-flight.
struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Runs one action at a time and keeps the status of the last one.
///
/// Clones share the busy flag and status.
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    name: &'static str,
    busy: Arc<AtomicBool>,
    status: Arc<RwLock<Option<OperationStatus>>>,
}

impl ActionDispatcher {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            busy: Arc::new(AtomicBool::new(false)),
            status: Arc::new(RwLock::new(None)),
        }
    }

    /// A dispatcher with its own busy flag that writes the same status line.
    pub fn sharing_status(&self, name: &'static str) -> Self {
        Self {
            name,
            busy: Arc::new(AtomicBool::new(false)),
            status: self.status.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Status of the most recent action, if any.
    pub async fn status(&self) -> Option<OperationStatus> {
        self.status.read().await.clone()
    }

    pub async fn clear_status(&self) {
        *self.status.write().await = None;
    }

    /// Replaces the status without running an action.
    pub async fn report(&self, status: OperationStatus) {
        *self.status.write().await = Some(status);
    }

    /// Awaits `action` once and records the outcome.
    ///
    /// # Errors
    /// Returns `ConsoleError::ActionInProgress` without polling `action` if a
    /// previous dispatch has not finished; otherwise returns the action's
    /// own error.
    pub async fn dispatch<T, Fut>(&self, messages: ActionMessages, action: Fut) -> ConsoleResult<T>
    where
        Fut: Future<Output = ConsoleResult<T>>,
    {
        self.dispatch_with(messages, action, |_| None).await
    }

    /// Like [`dispatch`](Self::dispatch), but `success` may replace the
    /// success text based on the action's output.
    pub async fn dispatch_with<T, Fut, S>(
        &self,
        messages: ActionMessages,
        action: Fut,
        success: S,
    ) -> ConsoleResult<T>
    where
        Fut: Future<Output = ConsoleResult<T>>,
        S: FnOnce(&T) -> Option<String>,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(action = self.name, "Action already in progress, ignoring");
            return Err(ConsoleError::ActionInProgress(self.name.to_string()));
        }
        let _guard = BusyGuard {
            flag: self.busy.clone(),
        };

        self.clear_status().await;
        let result = action.await;

        let status = match &result {
            Ok(value) => {
                OperationStatus::Success(success(value).unwrap_or_else(|| messages.success.clone()))
            }
            Err(e) => {
                tracing::warn!(action = self.name, error = %e, "Action failed");
                OperationStatus::Error(messages.failure_text(e))
            }
        };
        self.report(status).await;

        result
    }

    /// Records a client-side rejection and returns it as an error.
    ///
    /// No request is made.
    pub async fn reject(&self, message: impl Into<String>) -> ConsoleError {
        let message = message.into();
        self.report(OperationStatus::Error(message.clone())).await;
        ValidationError::ConstraintViolation(message).into()
    }
}
