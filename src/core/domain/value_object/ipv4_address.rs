use crate::core::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated IPv4 address in dotted-quad notation, as accepted by the
/// proxy allow/block lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ipv4Address(String);

impl Ipv4Address {
    /// Creates a new address after validating it.
    pub fn new(address: impl Into<String>) -> Result<Self, ValidationError> {
        let address = address.into();
        validate_ipv4(&address)?;
        Ok(Self(address))
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ipv4Address {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ipv4Address> for String {
    fn from(value: Ipv4Address) -> Self {
        value.0
    }
}

/// Validates an IPv4 dotted quad.
///
/// Each of the four octets is one to three ASCII digits with a value of at
/// most 255. Leading zeros are tolerated ("010" is accepted), signs,
/// whitespace and CIDR suffixes are not.
pub(crate) fn validate_ipv4(address: &str) -> Result<(), ValidationError> {
    if address.is_empty() {
        return Err(ValidationError::Field {
            field: "ip".to_string(),
            message: "IP address cannot be empty".to_string(),
        });
    }

    let octets: Vec<&str> = address.split('.').collect();
    if octets.len() != 4 {
        return Err(ValidationError::Format(format!(
            "Expected 4 octets, found {}",
            octets.len()
        )));
    }

    for octet in octets {
        if octet.is_empty() || octet.len() > 3 || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::Format(format!(
                "Invalid octet '{}'",
                octet
            )));
        }
        // At most three digits, so this cannot overflow.
        let value: u16 = octet
            .parse()
            .map_err(|_| ValidationError::Format(format!("Invalid octet '{}'", octet)))?;
        if value > 255 {
            return Err(ValidationError::ConstraintViolation(format!(
                "Octet {} is out of range (0-255)",
                value
            )));
        }
    }

    Ok(())
}
