//! Tracing output settings.
//!
//! `level` is a full `EnvFilter` directive string (`"info"`,
//! `"warn,reqwest=debug"`). `component_levels` narrows individual modules of
//! this crate, keyed by their path below the crate root.

use crate::core::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Top-level modules that emit events and may be given their own level.
pub const LOG_COMPONENTS: [&str; 4] = ["config", "core", "dashboard", "logging"];

/// How events are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Multi-line output for a developer terminal
    #[default]
    Pretty,
    /// One line per event, for running next to a TUI
    Compact,
    /// Newline-delimited JSON for log shippers
    Json,
}

impl FromStr for LogFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(ValidationError::Field {
                field: "logging.format".to_string(),
                message: format!(
                    "Unknown log format '{}', expected pretty, compact or json",
                    other
                ),
            }),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Per-module levels, e.g. `{"core::infrastructure" = "debug"}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_levels: Option<HashMap<String, String>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            component_levels: None,
        }
    }
}

impl LoggingConfig {
    /// Checks that the level parses as a filter and that every component
    /// names a module of this crate with a plain level.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.level.trim().is_empty() {
            return Err(level_error("Log level cannot be empty".to_string()));
        }
        EnvFilter::try_new(&self.level)
            .map_err(|e| level_error(format!("Invalid filter '{}': {}", self.level, e)))?;

        let Some(components) = &self.component_levels else {
            return Ok(());
        };
        for (component, level) in components {
            check_component(component)?;
            LevelFilter::from_str(level.trim()).map_err(|_| ValidationError::Field {
                field: format!("logging.component_levels.{}", component),
                message: format!("Invalid level '{}'", level),
            })?;
        }
        Ok(())
    }
}

fn level_error(message: String) -> ValidationError {
    ValidationError::Field {
        field: "logging.level".to_string(),
        message,
    }
}

fn check_component(component: &str) -> Result<(), ValidationError> {
    let mut segments = component.split("::");
    let root = segments.next().unwrap_or_default();
    let well_formed = segments.all(|s| {
        !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    });

    if LOG_COMPONENTS.contains(&root) && well_formed {
        Ok(())
    } else {
        Err(ValidationError::Field {
            field: "logging.component_levels".to_string(),
            message: format!(
                "Unknown component '{}', expected a path under one of: {}",
                component,
                LOG_COMPONENTS.join(", ")
            ),
        })
    }
}
