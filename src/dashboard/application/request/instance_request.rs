use serde::Serialize;

/// Body of `/start-llm-instance/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartInstanceRequest {
    pub model: String,
    pub external_port: u16,
    pub ngl: u32,
    pub template: String,
    pub custom_params: String,
}

/// Body of `/stop-llm-instance/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StopInstanceRequest {
    pub external_port: u16,
}
