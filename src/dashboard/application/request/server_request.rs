use serde::Serialize;

/// Body of `/start-server/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartServerRequest {
    pub model: String,
    pub host: String,
    pub port: u16,
    pub ngl: u32,
    pub template: String,
    pub custom_params: String,
}
