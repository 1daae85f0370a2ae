//! Multi-instance LLM management over the fixed external port pool.

use crate::{
    ConsoleError, ConsoleResult,
    core::{
        domain::{
            model::{
                llm_instance::{InstanceRecord, RunningInstances},
                log_source::LogSource,
            },
            value_object::{AVAILABLE_EXTERNAL_PORTS, ExternalPort},
        },
        infrastructure::poller::PollHandle,
    },
    dashboard::application::{
        control_api::ControlApi,
        request::instance_request::{StartInstanceRequest, StopInstanceRequest},
        response::action_reply::ActionReply,
        service::{
            action_dispatcher::{ActionDispatcher, ActionMessages, OperationStatus},
            log_viewer::LogViewer,
        },
    },
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Launch form for a new instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceForm {
    pub model: String,
    pub external_port: u16,
    pub ngl: u32,
    pub template: String,
    pub custom_params: String,
}

impl Default for InstanceForm {
    fn default() -> Self {
        Self {
            model: String::new(),
            external_port: AVAILABLE_EXTERNAL_PORTS[0],
            ngl: 30,
            template: "chatml".to_string(),
            custom_params: String::new(),
        }
    }
}

/// Mirror of `/list-llm-instances/` plus start/stop actions.
#[derive(Clone)]
pub struct InstanceRegistry {
    api: Arc<dyn ControlApi>,
    instances: Arc<RwLock<RunningInstances>>,
    form: Arc<RwLock<InstanceForm>>,
    models: Arc<RwLock<Vec<String>>>,
    start_action: ActionDispatcher,
    stop_actions: Arc<HashMap<u16, ActionDispatcher>>,
    log_period: Duration,
    open_logs: Arc<Mutex<Option<LogViewer>>>,
}

impl InstanceRegistry {
    pub fn new(api: Arc<dyn ControlApi>, log_period: Duration) -> Self {
        let start_action = ActionDispatcher::new("start-llm-instance");
        let stop_actions = AVAILABLE_EXTERNAL_PORTS
            .iter()
            .map(|&port| (port, start_action.sharing_status("stop-llm-instance")))
            .collect();
        Self {
            api,
            instances: Arc::new(RwLock::new(RunningInstances::new())),
            form: Arc::new(RwLock::new(InstanceForm::default())),
            models: Arc::new(RwLock::new(Vec::new())),
            start_action,
            stop_actions: Arc::new(stop_actions),
            log_period,
            open_logs: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn instances(&self) -> RunningInstances {
        self.instances.read().await.clone()
    }

    pub async fn instance(&self, port: u16) -> Option<InstanceRecord> {
        self.instances.read().await.get(&port).cloned()
    }

    pub async fn form(&self) -> InstanceForm {
        self.form.read().await.clone()
    }

    pub async fn set_form(&self, form: InstanceForm) {
        *self.form.write().await = form;
    }

    pub async fn models(&self) -> Vec<String> {
        self.models.read().await.clone()
    }

    pub async fn status(&self) -> Option<OperationStatus> {
        self.start_action.status().await
    }

    pub fn start_action(&self) -> &ActionDispatcher {
        &self.start_action
    }

    /// Returns `true` while a stop for `port` is in flight.
    pub fn is_stopping(&self, port: u16) -> bool {
        self.stop_actions
            .get(&port)
            .is_some_and(ActionDispatcher::is_busy)
    }

    /// The pool minus ports with a listed instance, in pool order.
    pub async fn free_ports(&self) -> Vec<ExternalPort> {
        let instances = self.instances.read().await;
        ExternalPort::all()
            .filter(|p| !instances.contains_key(&p.get()))
            .collect()
    }

    /// Replaces the mirror with the backend's list.
    ///
    /// When the selected port is taken afterwards, the form moves to the
    /// first free port.
    pub async fn refresh(&self) {
        match self.api.list_llm_instances().await {
            Ok(listed) => {
                *self.instances.write().await = listed;
                self.reselect_port().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch running instances");
                self.instances.write().await.clear();
                self.start_action
                    .report(OperationStatus::Error(
                        "Failed to fetch instance status.".to_string(),
                    ))
                    .await;
            }
        }
    }

    async fn reselect_port(&self) {
        let free = self.free_ports().await;
        let mut form = self.form.write().await;
        if !free.iter().any(|p| p.get() == form.external_port) {
            if let Some(first) = free.first() {
                form.external_port = first.get();
            }
        }
    }

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

    /// Starts an instance from the current form.
    ///
    /// # Errors
    /// Rejects without a request when no model is selected or the port is
    /// taken or outside the pool.
    pub async fn start(&self) -> ConsoleResult<ActionReply> {
        let form = self.form.read().await.clone();
        let model = form.model.trim();
        let port = form.external_port;

        if model.is_empty() {
            return Err(self.start_action.reject("Please select a model.").await);
        }
        if ExternalPort::new(port).is_err() {
            return Err(self
                .start_action
                .reject(format!("Port {} is not an available external port.", port))
                .await);
        }
        if self.instances.read().await.contains_key(&port) {
            return Err(self
                .start_action
                .reject(format!("Port {} is already in use.", port))
                .await);
        }

        let request = StartInstanceRequest {
            model: model.to_string(),
            external_port: port,
            ngl: form.ngl,
            template: form.template.clone(),
            custom_params: form.custom_params.trim().to_string(),
        };
        let messages = ActionMessages::new(format!("Instance on port {} started successfully!", port))
            .on_failure("Failed to start instance")
            .on_network("Network error or backend unavailable. Please try again.");

        let reply = self
            .start_action
            .dispatch(messages, self.api.start_llm_instance(request))
            .await?;
        self.refresh().await;
        Ok(reply)
    }

    /// Stops the instance on `port` and then refreshes once, whatever the
    /// outcome. The entry is never removed locally.
    pub async fn stop(&self, port: u16) -> ConsoleResult<ActionReply> {
        let Some(action) = self.stop_actions.get(&port) else {
            return Err(self
                .start_action
                .reject(format!("Port {} is not an available external port.", port))
                .await);
        };
        if action.is_busy() {
            return Err(ConsoleError::ActionInProgress(format!(
                "stop-llm-instance:{}",
                port
            )));
        }

        self.close_logs_for(port).await;

        let messages = ActionMessages::new(format!("Instance on port {} stopped successfully!", port))
            .on_failure(format!("Failed to stop instance {}", port))
            .on_network(format!(
                "Network error stopping instance {}. Please try again.",
                port
            ));
        let result = action
            .dispatch(
                messages,
                self.api.stop_llm_instance(StopInstanceRequest {
                    external_port: port,
                }),
            )
            .await;

        if matches!(result, Err(ConsoleError::ActionInProgress(_))) {
            return result;
        }
        self.refresh().await;
        result
    }

    /// The open instance log viewer, if any.
    pub async fn log_viewer(&self) -> Option<LogViewer> {
        self.open_logs.lock().await.clone()
    }

    /// Opens the log viewer for `port`, or closes it when it is already the
    /// open one. At most one instance viewer is open. Returns whether a
    /// viewer for `port` is open afterwards.
    pub async fn toggle_logs(&self, port: u16) -> ConsoleResult<bool> {
        let port = ExternalPort::new(port)?;
        let mut open = self.open_logs.lock().await;

        if let Some(current) = open.take() {
            current.close().await;
            if current.source() == LogSource::Instance(port) {
                return Ok(false);
            }
        }

        let viewer = LogViewer::new(self.api.clone(), LogSource::Instance(port), self.log_period);
        viewer.open().await?;
        *open = Some(viewer);
        Ok(true)
    }

    async fn close_logs_for(&self, port: u16) {
        let mut open = self.open_logs.lock().await;
        let viewing = open
            .as_ref()
            .is_some_and(|v| matches!(v.source(), LogSource::Instance(p) if p.get() == port));
        if viewing {
            if let Some(viewer) = open.take() {
                viewer.close().await;
            }
        }
    }

    pub fn start_polling(&self, period: Duration) -> ConsoleResult<PollHandle> {
        let registry = self.clone();
        PollHandle::spawn("instances", period, move || {
            let registry = registry.clone();
            async move { registry.refresh().await }
        })
    }
}
