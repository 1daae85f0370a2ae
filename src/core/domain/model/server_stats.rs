//! Domain models for the `/stats/` endpoint.
//!
//! The same document feeds the run-state poller and the resource meters.

use crate::core::domain::value_object::serde_helpers;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Host utilization and process run-state as reported by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerStats {
    /// CPU usage percentage (0-100).
    #[serde(default, deserialize_with = "serde_helpers::percent::deserialize")]
    pub cpu: f64,
    /// RAM usage percentage (0-100).
    #[serde(default, deserialize_with = "serde_helpers::percent::deserialize")]
    pub ram: f64,
    /// Highest GPU utilization across devices (0-100).
    #[serde(default, deserialize_with = "serde_helpers::percent::deserialize")]
    pub gpu: f64,
    /// Whether the single-instance LLM server is running.
    #[serde(default, deserialize_with = "serde_helpers::nullable_bool::deserialize")]
    pub server_running: bool,
    /// Whether the Stable Diffusion server is running.
    #[serde(default, deserialize_with = "serde_helpers::nullable_bool::deserialize")]
    pub sd_running: bool,
    /// Per-instance state keyed by external port (multi-instance backends only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_instances: Option<BTreeMap<u16, String>>,
}

impl ServerStats {
    /// Returns `true` if the single server or any listed instance is running.
    pub fn llm_running(&self) -> bool {
        self.server_running
            || self
                .llm_instances
                .as_ref()
                .is_some_and(|m| m.values().any(|s| s == "running"))
    }

    /// Returns the utilization part of the document.
    pub fn sample(&self) -> ResourceSample {
        ResourceSample {
            cpu: self.cpu,
            ram: self.ram,
            gpu: self.gpu,
        }
    }
}

/// Run-state of one backend service as shown in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceState {
    /// No poll has completed yet.
    #[default]
    Unknown,
    Running,
    Stopped,
}

impl ServiceState {
    pub fn from_running(running: bool) -> Self {
        if running {
            ServiceState::Running
        } else {
            ServiceState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ServiceState::Running)
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServiceState::Unknown => "Unknown",
            ServiceState::Running => "Running",
            ServiceState::Stopped => "Stopped",
        })
    }
}

/// A point-in-time host utilization sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResourceSample {
    pub cpu: f64,
    pub ram: f64,
    pub gpu: f64,
}

/// Coarse usage bucket used to color a meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UsageLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl UsageLevel {
    pub fn from_percent(value: f64) -> Self {
        if value > 80.0 {
            UsageLevel::Critical
        } else if value > 60.0 {
            UsageLevel::High
        } else if value > 40.0 {
            UsageLevel::Medium
        } else {
            UsageLevel::Low
        }
    }
}
