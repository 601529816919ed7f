//! Error handling for the library.
//!
//! A single [`LlmError`] enum covers configuration problems, remote provider
//! failures and history persistence failures. Provider calls are never
//! retried; every failure is surfaced to the immediate caller.

use thiserror::Error;

/// Unified error type.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Invalid or incomplete configuration (bad base URL, HTTP client build
    /// failure, out-of-range parameter defaults).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The API key for a provider is missing or empty. Fatal for that
    /// provider only; the message carries remediation instructions.
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    /// A request parameter is outside its valid range.
    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter { name: String, message: String },

    /// The remote endpoint rejected the credentials (HTTP 401/403).
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// The remote endpoint rate-limited the request (HTTP 429).
    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    /// Any other non-success HTTP response from a provider.
    #[error("API error {code}: {message}")]
    ApiError { code: u16, message: String },

    /// Transport-level failure (connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The provider returned a body we could not interpret.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// JSON serialization/deserialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Filesystem failure while saving or loading history.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Caller-supplied input that the library cannot act on.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A bug on our side.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl LlmError {
    /// Classify a non-success HTTP response from a provider endpoint.
    ///
    /// 401/403 become [`LlmError::AuthenticationError`], 429 becomes
    /// [`LlmError::RateLimitError`], everything else is an
    /// [`LlmError::ApiError`] carrying the status code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitError(message),
            _ => Self::ApiError {
                code: status,
                message,
            },
        }
    }

    /// Whether this error originated in a remote provider call, as opposed
    /// to local configuration or persistence.
    pub const fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationError(_)
                | Self::RateLimitError(_)
                | Self::ApiError { .. }
                | Self::HttpError(_)
                | Self::ParseError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(matches!(
            LlmError::from_status(401, "bad key"),
            LlmError::AuthenticationError(_)
        ));
        assert!(matches!(
            LlmError::from_status(403, "forbidden"),
            LlmError::AuthenticationError(_)
        ));
        assert!(matches!(
            LlmError::from_status(429, "slow down"),
            LlmError::RateLimitError(_)
        ));
        assert!(matches!(
            LlmError::from_status(500, "oops"),
            LlmError::ApiError { code: 500, .. }
        ));
    }

    #[test]
    fn provider_error_predicate() {
        assert!(LlmError::from_status(500, "oops").is_provider_error());
        assert!(!LlmError::MissingApiKey("OPENAI_API_KEY".into()).is_provider_error());
    }
}
