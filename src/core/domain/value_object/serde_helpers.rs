//! Serde helpers for the backend's loosely typed JSON.

use serde::{Deserialize, Deserializer};

/// Deserialize a boolean that the backend may send as `null`.
///
/// The stats endpoint reports `process and process.poll() is None`, which
/// serializes as `null` when no process was ever started.
pub mod nullable_bool {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
    }
}

/// Deserialize a percentage sent either as an integer or a float, clamping
/// it into `0.0..=100.0`.
pub mod percent {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
        Ok(if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 100.0)
        })
    }
}
