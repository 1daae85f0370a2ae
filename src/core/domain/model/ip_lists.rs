//! Domain models for proxy access control.
//!
//! Two backend contracts exist: a combined allow/block list exchanged as
//! comma-joined strings, and per-service CIDR files exchanged as raw text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel the backend reads as "allow everyone".
pub const OPEN_ACCESS_SENTINEL: &str = "0.0.0.0";

/// Which half of the combined list an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Allow,
    Block,
}

impl ListKind {
    /// Endpoint that replaces this list.
    pub fn update_path(&self) -> &'static str {
        match self {
            ListKind::Allow => "/update-allowlist/",
            ListKind::Block => "/update-blocklist/",
        }
    }

    /// JSON key the update endpoint expects.
    pub fn payload_key(&self) -> &'static str {
        match self {
            ListKind::Allow => "allowlist",
            ListKind::Block => "blocklist",
        }
    }

    /// Word used in status messages.
    pub fn label(&self) -> &'static str {
        match self {
            ListKind::Allow => "allow",
            ListKind::Block => "block",
        }
    }

    fn list_name(&self) -> &'static str {
        match self {
            ListKind::Allow => "allowed",
            ListKind::Block => "blocked",
        }
    }
}

/// Raw `/allowlist/` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IpListsResponse {
    #[serde(default)]
    pub allowlist: Option<String>,
    #[serde(default)]
    pub blocklist: Option<String>,
}

/// Client mirror of the combined allow/block list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpLists {
    pub allowed: Vec<String>,
    pub blocked: Vec<String>,
}

impl IpLists {
    pub fn entries(&self, kind: ListKind) -> &[String] {
        match kind {
            ListKind::Allow => &self.allowed,
            ListKind::Block => &self.blocked,
        }
    }

    pub fn contains(&self, kind: ListKind, ip: &str) -> bool {
        self.entries(kind).iter().any(|e| e == ip)
    }

    /// The duplicate message shown when `ip` is already in `kind`.
    pub fn duplicate_message(kind: ListKind, ip: &str) -> String {
        format!("IP {} is already in the {} list.", ip, kind.list_name())
    }

    /// The message shown when `ip` is not in `kind`.
    pub fn missing_message(kind: ListKind, ip: &str) -> String {
        format!("IP {} is not in the {} list.", ip, kind.list_name())
    }

    /// Wire value for `kind` after appending `ip`.
    pub fn with_added(&self, kind: ListKind, ip: &str) -> String {
        let mut entries = self.entries(kind).to_vec();
        entries.push(ip.to_string());
        serialize_list(kind, &entries)
    }

    /// Wire value for `kind` after removing every occurrence of `ip`.
    pub fn with_removed(&self, kind: ListKind, ip: &str) -> String {
        let entries: Vec<String> = self
            .entries(kind)
            .iter()
            .filter(|e| e.as_str() != ip)
            .cloned()
            .collect();
        serialize_list(kind, &entries)
    }

    pub fn summary(&self) -> AccessSummary {
        AccessSummary {
            mode: if self.allowed.is_empty() {
                AccessMode::Open
            } else {
                AccessMode::Restricted(self.allowed.len())
            },
            blocked: self.blocked.len(),
        }
    }
}

impl From<IpListsResponse> for IpLists {
    fn from(response: IpListsResponse) -> Self {
        let allowed = match response.allowlist.as_deref() {
            None | Some("") | Some(OPEN_ACCESS_SENTINEL) => Vec::new(),
            Some(list) => split_list(list),
        };
        let blocked = response
            .blocklist
            .as_deref()
            .map(split_list)
            .unwrap_or_default();
        Self { allowed, blocked }
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins entries for the wire.
///
/// An empty allow list must go out as [`OPEN_ACCESS_SENTINEL`], an empty block
/// list as the empty string. The backend treats the two differently.
pub fn serialize_list(kind: ListKind, entries: &[String]) -> String {
    let joined = entries
        .iter()
        .map(String::as_str)
        .filter(|e| !e.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    if joined.is_empty() && kind == ListKind::Allow {
        OPEN_ACCESS_SENTINEL.to_string()
    } else {
        joined
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Open,
    Restricted(usize),
}

/// What the access banner displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessSummary {
    pub mode: AccessMode,
    pub blocked: usize,
}

impl fmt::Display for AccessSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            AccessMode::Open => write!(f, "OPEN ACCESS: All IPs allowed.")?,
            AccessMode::Restricted(n) => {
                write!(f, "RESTRICTED ACCESS: Access restricted to {} IP(s).", n)?
            }
        }
        if self.blocked > 0 {
            write!(f, " {} IP(s) explicitly blocked.", self.blocked)?;
        }
        Ok(())
    }
}

/// A service with its own Nginx allowlist file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    #[default]
    Frontend,
    Llm,
    Sd,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 3] = [ServiceKind::Frontend, ServiceKind::Llm, ServiceKind::Sd];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Frontend => "frontend",
            ServiceKind::Llm => "llm",
            ServiceKind::Sd => "sd",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "frontend" => Ok(ServiceKind::Frontend),
            "llm" => Ok(ServiceKind::Llm),
            "sd" => Ok(ServiceKind::Sd),
            _ => Err(format!("Invalid service: {}", s)),
        }
    }
}
