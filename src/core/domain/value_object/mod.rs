mod api_base_url;
mod external_port;
mod ipv4_address;
pub(crate) mod serde_helpers;

pub use api_base_url::ApiBaseUrl;
pub use external_port::{AVAILABLE_EXTERNAL_PORTS, ExternalPort};
pub use ipv4_address::Ipv4Address;

// Re-export validation functions for internal use
pub(crate) use api_base_url::validate_url;
