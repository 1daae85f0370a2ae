use serde::Deserialize;

/// Success body of any mutating endpoint.
///
/// The backend answers `{"status": "..."}` plus endpoint-specific extras.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Error body of a non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Renders `detail` for display: strings verbatim, anything else
    /// (e.g. validation error arrays) as compact JSON.
    pub fn detail_text(&self) -> Option<String> {
        match &self.detail {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_reply_keeps_extras() {
        let reply: ActionReply = serde_json::from_value(serde_json::json!({
            "status": "LLM instance started",
            "internal_port": 1338
        }))
        .unwrap();
        assert_eq!(reply.status.as_deref(), Some("LLM instance started"));
        assert_eq!(reply.extra["internal_port"], 1338);
    }

    #[test]
    fn test_error_body_detail_text() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "bad format"}"#).unwrap();
        assert_eq!(body.detail_text().as_deref(), Some("bad format"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": [{"loc": ["body"], "msg": "field required"}]}"#)
                .unwrap();
        assert!(body.detail_text().unwrap().contains("field required"));

        let body: ErrorBody = serde_json::from_str(r#"{"error": "x"}"#).unwrap();
        assert!(body.detail_text().is_none());
    }
}
