use thiserror::Error;

/// The main error type for control-panel operations.
///
/// This enum represents every way a call against the inference stack's
/// control API can fail, plus the client-side rejections that happen
/// before any request is sent.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Represents transport failures (no HTTP response at all)
    ///
    /// # Fields
    /// * `0` - A description of what went wrong while talking to the backend
    #[error("Connection error: {0}")]
    Connection(String),

    /// Represents a non-2xx response from the backend
    ///
    /// # Fields
    /// * `status` - The HTTP status code
    /// * `detail` - The `detail` field of the JSON body, if one could be parsed
    #[error("API error ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    /// Represents client-side validation failures
    ///
    /// # Fields
    /// * `source` - The underlying validation error
    #[error("Validation error: {source}")]
    Validation {
        #[from]
        source: ValidationError,
    },

    /// Represents an invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The same action is already in flight and a second submission was refused
    #[error("Action already in progress: {0}")]
    ActionInProgress(String),
}

impl ConsoleError {
    /// Returns the backend-supplied detail, falling back to a generic
    /// description of the status code.
    pub fn detail_or_generic(&self) -> String {
        match self {
            ConsoleError::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ConsoleError::Api {
                status,
                detail: None,
            } => format!("Server responded with status: {}", status),
            other => other.to_string(),
        }
    }

    /// Returns `true` when no HTTP response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, ConsoleError::Connection(_))
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    ///
    /// # Fields
    /// * `0` - Description of the format violation
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    ///
    /// # Fields
    /// * `0` - Description of the constraint violation
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Type alias for Results that may fail with a ConsoleError
pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_or_generic_prefers_detail() {
        let err = ConsoleError::Api {
            status: 400,
            detail: Some("bad format".to_string()),
        };
        assert_eq!(err.detail_or_generic(), "bad format");
    }

    #[test]
    fn test_detail_or_generic_falls_back_to_status() {
        let err = ConsoleError::Api {
            status: 502,
            detail: None,
        };
        assert_eq!(err.detail_or_generic(), "Server responded with status: 502");
    }

    #[test]
    fn test_validation_conversion_keeps_source() {
        let err: ConsoleError = ValidationError::Format("nope".to_string()).into();
        assert!(matches!(
            err,
            ConsoleError::Validation {
                source: ValidationError::Format(_)
            }
        ));
        assert!(!err.is_network());
    }
}
