//! Domain models for multi-instance LLM management.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The launch configuration the backend stored for an instance.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InstanceConfig {
    /// Model filename under the backend's model directory.
    pub model: String,
    /// External port Nginx exposes for this instance.
    pub external_port: u16,
    /// Host the inference server binds internally.
    #[serde(default = "default_host")]
    pub host: String,
    /// Number of layers offloaded to the GPU.
    #[serde(default)]
    pub ngl: u32,
    /// Chat template name.
    #[serde(default)]
    pub template: String,
    /// Extra command-line arguments.
    #[serde(default)]
    pub custom_params: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// One running LLM server process as listed by `/list-llm-instances/`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InstanceRecord {
    pub config: InstanceConfig,
    /// Path of the instance log on the backend host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
    /// Process state ("running" for every listed entry).
    #[serde(default = "default_status")]
    pub status: String,
    /// Backend-side process id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    /// Port the process listens on behind the proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_port: Option<u16>,
}

fn default_status() -> String {
    "running".to_string()
}

/// Running instances keyed by external port.
pub type RunningInstances = BTreeMap<u16, InstanceRecord>;
