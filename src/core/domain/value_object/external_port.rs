use crate::core::domain::error::ValidationError;
use std::fmt;

/// The external ports Nginx exposes for LLM instances.
pub const AVAILABLE_EXTERNAL_PORTS: [u16; 5] = [1337, 1339, 1341, 1343, 1345];

/// An external port taken from the fixed LLM instance pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExternalPort(u16);

impl ExternalPort {
    /// Creates a new port after checking it belongs to the pool.
    pub fn new(port: u16) -> Result<Self, ValidationError> {
        validate_external_port(port)?;
        Ok(Self(port))
    }

    /// Creates a new port without validation.
    #[cfg(test)]
    pub(crate) fn new_unchecked(port: u16) -> Self {
        Self(port)
    }

    /// Returns the port number.
    pub fn get(&self) -> u16 {
        self.0
    }

    /// Iterates over the whole pool in its fixed order.
    pub fn all() -> impl Iterator<Item = ExternalPort> {
        AVAILABLE_EXTERNAL_PORTS.into_iter().map(ExternalPort)
    }
}

impl fmt::Display for ExternalPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validates that a port is part of the instance pool.
pub(crate) fn validate_external_port(port: u16) -> Result<(), ValidationError> {
    if !AVAILABLE_EXTERNAL_PORTS.contains(&port) {
        return Err(ValidationError::Field {
            field: "external_port".to_string(),
            message: format!(
                "Port {} is not one of the available external ports {:?}",
                port, AVAILABLE_EXTERNAL_PORTS
            ),
        });
    }
    Ok(())
}
