//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events; binaries that embed the console
//! call [`init_tracing`] once at startup.

use crate::config::{LogFormat, LoggingConfig};
use crate::{ConsoleError, ConsoleResult};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Builds the filter string from the base level plus any per-module levels.
///
/// Keys are sorted so the output is stable.
///
/// ```
/// use std::collections::HashMap;
/// use velesio_console::config::{LogFormat, LoggingConfig};
/// use velesio_console::logging::build_filter_directives;
///
/// let config = LoggingConfig {
///     level: "warn".to_string(),
///     format: LogFormat::Pretty,
///     component_levels: Some(HashMap::from([(
///         "core::infrastructure".to_string(),
///         "debug".to_string(),
///     )])),
/// };
/// assert_eq!(
///     build_filter_directives(&config),
///     "warn,velesio_console::core::infrastructure=debug"
/// );
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        let mut components: Vec<_> = component_levels.iter().collect();
        components.sort();
        for (component, level) in components {
            filter_str.push_str(&format!(",velesio_console::{}={}", component, level));
        }
    }

    filter_str
}

/// Installs a global subscriber. `RUST_LOG` takes precedence over `config`.
///
/// # Errors
/// Returns `ConsoleError::Validation` for a filter that does not parse and
/// `ConsoleError::Config` if a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> ConsoleResult<()> {
    config.validate()?;
    let filter_str = build_filter_directives(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let result = match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    result.map_err(|e| ConsoleError::Config(format!("Failed to install tracing subscriber: {}", e)))
}
