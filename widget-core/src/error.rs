use thiserror::Error;

/// Every way a refresh cycle can fail before a snapshot is built.
///
/// None of these escape the pipeline: each one is turned into a degraded
/// snapshot by the widget that owns the cycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// No server address stored yet.
    #[error("No server configured")]
    NotConfigured,

    #[error("Server unreachable: {0}")]
    Unreachable(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server responded with HTTP status {0}")]
    HttpStatus(u16),

    #[error("I/O error: {0}")]
    IoError(String),

    /// Body was not JSON or lacked the expected top-level shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl WidgetError {
    pub fn is_not_configured(&self) -> bool {
        matches!(self, WidgetError::NotConfigured)
    }

    /// Network-layer failures share one user-facing message.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            WidgetError::Unreachable(_)
                | WidgetError::Timeout
                | WidgetError::HttpStatus(_)
                | WidgetError::IoError(_)
        )
    }
}

impl From<serde_json::Error> for WidgetError {
    fn from(err: serde_json::Error) -> Self {
        WidgetError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(WidgetError::NotConfigured.is_not_configured());
        assert!(!WidgetError::NotConfigured.is_network());
        assert!(WidgetError::HttpStatus(500).is_network());
        assert!(WidgetError::Timeout.is_network());
        assert!(!WidgetError::MalformedResponse("x".into()).is_network());
    }

    #[test]
    fn json_errors_become_malformed_response() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: WidgetError = err.into();
        assert!(matches!(err, WidgetError::MalformedResponse(_)));
    }

    #[test]
    fn status_is_in_message() {
        assert!(WidgetError::HttpStatus(503).to_string().contains("503"));
    }
}
