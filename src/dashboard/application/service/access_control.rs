//! Reverse-proxy access control panels.
//!
//! [`IpAccessPanel`] edits the combined allow/block lists, [`AllowedIpsPanel`]
//! edits the free-form per-service files. The dashboard mounts one of them.

use crate::{
    ConsoleResult,
    core::domain::{
        model::ip_lists::{AccessSummary, IpLists, ListKind, ServiceKind},
        value_object::Ipv4Address,
    },
    dashboard::application::{
        control_api::ControlApi,
        request::access_request::{UpdateAllowedIpsRequest, UpdateIpListRequest},
        response::action_reply::ActionReply,
        service::action_dispatcher::{ActionDispatcher, ActionMessages, OperationStatus},
    },
};
use std::sync::Arc;
use tokio::sync::RwLock;

fn restart_messages() -> ActionMessages {
    ActionMessages::new("Nginx restarted successfully.")
        .on_failure("Failed to restart Nginx")
        .on_network("Network error restarting Nginx.")
}

/// Combined allow/block list editor backed by `/allowlist/`.
#[derive(Clone)]
pub struct IpAccessPanel {
    api: Arc<dyn ControlApi>,
    lists: Arc<RwLock<IpLists>>,
    add_action: ActionDispatcher,
    remove_action: ActionDispatcher,
    restart_action: ActionDispatcher,
}

impl IpAccessPanel {
    pub fn new(api: Arc<dyn ControlApi>) -> Self {
        let add_action = ActionDispatcher::new("add-ip");
        Self {
            api,
            lists: Arc::new(RwLock::new(IpLists::default())),
            remove_action: add_action.sharing_status("remove-ip"),
            restart_action: add_action.sharing_status("restart-nginx"),
            add_action,
        }
    }

    pub async fn lists(&self) -> IpLists {
        self.lists.read().await.clone()
    }

    pub async fn access_summary(&self) -> AccessSummary {
        self.lists.read().await.summary()
    }

    pub async fn status(&self) -> Option<OperationStatus> {
        self.add_action.status().await
    }

    /// Reloads both lists. On failure the mirror is left as it was.
    pub async fn refresh(&self) {
        match self.api.ip_lists().await {
            Ok(response) => *self.lists.write().await = response.into(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch IP lists");
                let message = ActionMessages::new("")
                    .on_failure("Failed to fetch IP lists")
                    .on_network("An unexpected error occurred while fetching IP settings.")
                    .failure_text(&e);
                self.add_action
                    .report(OperationStatus::Error(message))
                    .await;
            }
        }
    }

    /// Checks an address typed by the user. Returns the rejection text.
    fn check_input(ip: &str) -> Result<(), String> {
        if ip.is_empty() {
            return Err("IP address cannot be empty.".to_string());
        }
        Ipv4Address::new(ip).map_err(|_| {
            "Invalid IP format. Please use IPv4 format (e.g., 192.168.1.1).".to_string()
        })?;
        Ok(())
    }

    fn update_messages(kind: ListKind, success: String) -> ActionMessages {
        ActionMessages::new(success)
            .on_failure(format!("Failed to update {} list", kind.label()))
            .on_network(format!(
                "An unexpected error occurred while updating the {} list.",
                kind.label()
            ))
    }

    /// Appends `ip` to the `kind` list and re-fetches on success.
    ///
    /// # Errors
    /// Rejects without a request on an empty, malformed or duplicate address.
    pub async fn add(&self, ip: &str, kind: ListKind) -> ConsoleResult<ActionReply> {
        let ip = ip.trim();
        if let Err(message) = Self::check_input(ip) {
            return Err(self.add_action.reject(message).await);
        }

        let value = {
            let lists = self.lists.read().await;
            if lists.contains(kind, ip) {
                drop(lists);
                return Err(self
                    .add_action
                    .reject(IpLists::duplicate_message(kind, ip))
                    .await);
            }
            lists.with_added(kind, ip)
        };

        let messages =
            Self::update_messages(kind, format!("IP {} added to {} list!", ip, kind.label()));
        let reply = self
            .add_action
            .dispatch(
                messages,
                self.api.update_ip_list(UpdateIpListRequest { kind, value }),
            )
            .await?;
        self.refresh().await;
        Ok(reply)
    }

    /// Removes every occurrence of `ip` from the `kind` list.
    ///
    /// Any entry the mirror holds can be removed, including ones that are
    /// not dotted quads (the backend may list CIDR ranges).
    ///
    /// # Errors
    /// Rejects without a request on an empty address or one the list does
    /// not contain.
    pub async fn remove(&self, ip: &str, kind: ListKind) -> ConsoleResult<ActionReply> {
        let ip = ip.trim();
        if ip.is_empty() {
            return Err(self
                .remove_action
                .reject("IP address cannot be empty.")
                .await);
        }

        let value = {
            let lists = self.lists.read().await;
            if !lists.contains(kind, ip) {
                drop(lists);
                return Err(self
                    .remove_action
                    .reject(IpLists::missing_message(kind, ip))
                    .await);
            }
            lists.with_removed(kind, ip)
        };
        let messages = Self::update_messages(
            kind,
            format!("IP {} removed from {} list!", ip, kind.label()),
        );
        let reply = self
            .remove_action
            .dispatch(
                messages,
                self.api.update_ip_list(UpdateIpListRequest { kind, value }),
            )
            .await?;
        self.refresh().await;
        Ok(reply)
    }

    pub async fn restart_proxy(&self) -> ConsoleResult<ActionReply> {
        self.restart_action
            .dispatch(restart_messages(), self.api.restart_proxy())
            .await
    }
}

/// Per-service allowlist editor backed by `/get-allowed-ips/`.
///
/// Content is free text (one address or CIDR per line) and is sent back
/// unchanged.
#[derive(Clone)]
pub struct AllowedIpsPanel {
    api: Arc<dyn ControlApi>,
    service: Arc<RwLock<ServiceKind>>,
    content: Arc<RwLock<String>>,
    save_action: ActionDispatcher,
    restart_action: ActionDispatcher,
}

impl AllowedIpsPanel {
    pub fn new(api: Arc<dyn ControlApi>) -> Self {
        let save_action = ActionDispatcher::new("update-allowed-ips");
        Self {
            api,
            service: Arc::new(RwLock::new(ServiceKind::default())),
            content: Arc::new(RwLock::new(String::new())),
            restart_action: save_action.sharing_status("restart-nginx"),
            save_action,
        }
    }

    pub async fn service(&self) -> ServiceKind {
        *self.service.read().await
    }

    pub async fn content(&self) -> String {
        self.content.read().await.clone()
    }

    pub async fn set_content(&self, content: impl Into<String>) {
        *self.content.write().await = content.into();
    }

    pub async fn status(&self) -> Option<OperationStatus> {
        self.save_action.status().await
    }

    /// Selects `service` and loads its list. On failure the content is
    /// emptied.
    pub async fn load(&self, service: ServiceKind) {
        *self.service.write().await = service;
        self.save_action.clear_status().await;

        match self.api.allowed_ips(service).await {
            Ok(text) => *self.content.write().await = text,
            Err(e) => {
                tracing::warn!(service = %service, error = %e, "Failed to fetch allowed IPs");
                self.content.write().await.clear();
                let message = ActionMessages::new("")
                    .on_failure(format!("Failed to fetch {} IP allowlist", service))
                    .on_network(format!("Network error fetching {} IP allowlist.", service))
                    .failure_text(&e);
                self.save_action
                    .report(OperationStatus::Error(message))
                    .await;
            }
        }
    }

    /// Sends the buffer for the selected service.
    ///
    /// The backend's `status` text is shown when it sends one.
    pub async fn save(&self) -> ConsoleResult<ActionReply> {
        let service = self.service().await;
        let content = self.content().await;
        let messages = ActionMessages::new(format!(
            "Allowlist for {} updated. Restart Nginx to apply.",
            service
        ))
        .on_failure(format!("Failed to update {} allowlist", service))
        .on_network(format!("Network error saving {} allowlist.", service));

        self.save_action
            .dispatch_with(
                messages,
                self.api
                    .update_allowed_ips(UpdateAllowedIpsRequest { service, content }),
                |reply: &ActionReply| reply.status.clone(),
            )
            .await
    }

    pub async fn restart_proxy(&self) -> ConsoleResult<ActionReply> {
        self.restart_action
            .dispatch(restart_messages(), self.api.restart_proxy())
            .await
    }
}
