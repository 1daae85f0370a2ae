use crate::core::domain::value_object::ExternalPort;
use std::fmt;

/// Shown when a log endpoint returns an empty body.
pub const EMPTY_LOG_PLACEHOLDER: &str = "No logs available.";

/// A plain-text log endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogSource {
    /// Single-instance LLM server, `/logs/`.
    Llm,
    /// Stable Diffusion server, `/sd-logs/`.
    StableDiffusion,
    /// One multi-instance LLM process, `/llm-logs/?external_port=N`.
    Instance(ExternalPort),
}

impl LogSource {
    pub fn path(&self) -> &'static str {
        match self {
            LogSource::Llm => "/logs/",
            LogSource::StableDiffusion => "/sd-logs/",
            LogSource::Instance(_) => "/llm-logs/",
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            LogSource::Instance(port) => vec![("external_port", port.to_string())],
            _ => Vec::new(),
        }
    }

    /// Placeholder rendered when the fetch fails.
    pub fn error_placeholder(&self) -> String {
        match self {
            LogSource::Llm => "Error fetching logs.".to_string(),
            LogSource::StableDiffusion => "Error fetching Stable Diffusion logs.".to_string(),
            LogSource::Instance(port) => format!("Error fetching logs for port {}.", port),
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSource::Llm => f.write_str("llm"),
            LogSource::StableDiffusion => f.write_str("stable-diffusion"),
            LogSource::Instance(port) => write!(f, "llm:{}", port),
        }
    }
}
