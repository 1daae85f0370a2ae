//! Configuration for the console.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration.
//!
//! # Configuration Precedence
//!
//! 1. Builder calls on [`ConsoleClientBuilder`](crate::ConsoleClientBuilder)
//! 2. Environment variables (`VELESIO_*`)
//! 3. Configuration file (TOML)
//! 4. Default values
//!
//! # Example
//!
//! ```rust
//! use velesio_console::config::ConsoleConfig;
//!
//! let config = ConsoleConfig::from_toml_str(
//!     r#"
//! [api]
//! base_url = "https://gpu-box.local/api"
//!
//! [polling]
//! status_ms = 1000
//! "#,
//! )
//! .unwrap();
//! assert_eq!(config.api.base_url, "https://gpu-box.local/api");
//! assert_eq!(config.polling.resources_ms, 5000);
//! ```

pub mod logging;

pub use logging::{LogFormat, LoggingConfig};

use crate::core::domain::error::{ConsoleError, ConsoleResult, ValidationError};
use crate::core::domain::value_object::validate_url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost/api";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Control API connection settings
    pub api: ApiConfig,
    /// Poll periods
    pub polling: PollingConfig,
    /// Which IP access panel the dashboard mounts
    pub access_control: AccessControlMode,
    /// Tracing output
    pub logging: LoggingConfig,
}

impl ConsoleConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// Returns `ConsoleError::Config` on a parse failure, or the error from
    /// [`ConsoleConfig::validate`].
    pub fn from_toml_str(content: &str) -> ConsoleResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConsoleError::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub async fn from_file(path: impl AsRef<Path>) -> ConsoleResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ConsoleError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Applies `VELESIO_API_URL`, `VELESIO_LOG_LEVEL` and `VELESIO_LOG_FORMAT`.
    ///
    /// Unparseable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("VELESIO_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(level) = std::env::var("VELESIO_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("VELESIO_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        self
    }

    /// Checks the base URL, every poll period, the rate limit and the log
    /// filter.
    pub fn validate(&self) -> ConsoleResult<()> {
        validate_url(&self.api.base_url)?;
        self.polling.validate()?;
        self.logging.validate()?;
        if let Some(rl) = &self.api.rate_limit {
            rl.validate()?;
        }
        Ok(())
    }
}

/// Control API connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root that every endpoint path is appended to
    pub base_url: String,
    /// Accept self-signed certificates on the reverse proxy
    pub accept_invalid_certs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            accept_invalid_certs: false,
            rate_limit: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

impl RateLimitConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.requests_per_second == 0 || self.burst_size == 0 {
            return Err(ValidationError::ConstraintViolation(
                "Rate limit values must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Poll periods in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub status_ms: u64,
    pub resources_ms: u64,
    pub llm_logs_ms: u64,
    pub sd_logs_ms: u64,
    pub instances_ms: u64,
    pub sd_webui_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            status_ms: 3000,
            resources_ms: 5000,
            llm_logs_ms: 2000,
            sd_logs_ms: 5000,
            instances_ms: 5000,
            sd_webui_ms: 5000,
        }
    }
}

impl PollingConfig {
    pub fn status(&self) -> Duration {
        Duration::from_millis(self.status_ms)
    }

    pub fn resources(&self) -> Duration {
        Duration::from_millis(self.resources_ms)
    }

    pub fn llm_logs(&self) -> Duration {
        Duration::from_millis(self.llm_logs_ms)
    }

    pub fn sd_logs(&self) -> Duration {
        Duration::from_millis(self.sd_logs_ms)
    }

    pub fn instances(&self) -> Duration {
        Duration::from_millis(self.instances_ms)
    }

    pub fn sd_webui(&self) -> Duration {
        Duration::from_millis(self.sd_webui_ms)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let periods = [
            ("status_ms", self.status_ms),
            ("resources_ms", self.resources_ms),
            ("llm_logs_ms", self.llm_logs_ms),
            ("sd_logs_ms", self.sd_logs_ms),
            ("instances_ms", self.instances_ms),
            ("sd_webui_ms", self.sd_webui_ms),
        ];
        for (field, value) in periods {
            if value == 0 {
                return Err(ValidationError::Field {
                    field: field.to_string(),
                    message: "Poll period must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// The backend exposes two access-control contracts; only one panel is
/// mounted at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccessControlMode {
    /// Global allow/block lists via `/allowlist/`
    #[default]
    Combined,
    /// Free-form lists per service via `/get-allowed-ips/`
    PerService,
}
