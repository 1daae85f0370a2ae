use crate::core::domain::model::ip_lists::{ListKind, ServiceKind};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Body of `/update-allowlist/` or `/update-blocklist/`.
///
/// Serializes as a single-key object whose key depends on the list kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateIpListRequest {
    pub kind: ListKind,
    pub value: String,
}

impl Serialize for UpdateIpListRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.kind.payload_key(), &self.value)?;
        map.end()
    }
}

/// Body of `/update-allowed-ips/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateAllowedIpsRequest {
    pub service: ServiceKind,
    pub content: String,
}
