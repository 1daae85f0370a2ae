use crate::core::domain::model::model_catalog::ModelType;
use serde::Serialize;

/// Body of `/download-model/`.
///
/// Without a filename the backend saves the file as `model`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadModelRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(rename = "type")]
    pub model_type: ModelType,
}
