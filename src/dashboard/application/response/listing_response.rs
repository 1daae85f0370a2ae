use serde::Deserialize;

/// `/list-models/` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<String>,
}

/// `/check-sd-webui/` body.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WebUiAvailability {
    #[serde(default)]
    pub available: bool,
}
