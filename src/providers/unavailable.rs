//! Placeholder adapter for a provider whose client could not be built.
//!
//! A missing credential is fatal for the affected provider only: the session
//! keeps running with the other adapter, and any turn routed here surfaces
//! the remediation message instead of crashing.

use async_trait::async_trait;

use crate::error::LlmError;
use crate::traits::ChatModel;
use crate::types::{ChatMessage, ModelInfo};

/// Stands in for a provider that is not configured.
///
/// Every generation call fails with [`LlmError::MissingApiKey`] carrying the
/// original construction failure's message; the turn executor's failure
/// semantics then keep the transcript and rotation intact, so the caller can
/// switch to the working provider and continue.
pub struct UnavailableModel {
    organization: String,
    reason: String,
}

impl UnavailableModel {
    /// Create a placeholder with an explicit remediation message.
    pub fn new(organization: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            reason: reason.into(),
        }
    }

    /// Create a placeholder from the client construction error, unwrapping
    /// [`LlmError::MissingApiKey`] so the message is not double-prefixed
    /// when the call-site error is displayed.
    pub fn from_error(organization: impl Into<String>, error: LlmError) -> Self {
        let reason = match error {
            LlmError::MissingApiKey(message) => message,
            other => other.to_string(),
        };
        Self::new(organization, reason)
    }
}

#[async_trait]
impl ChatModel for UnavailableModel {
    async fn generate_with_history(
        &self,
        _messages: &[ChatMessage],
        _system: Option<&str>,
    ) -> Result<String, LlmError> {
        Err(LlmError::MissingApiKey(self.reason.clone()))
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: "(unconfigured)".to_string(),
            organization: self.organization.clone(),
            default_temperature: 0.0,
            max_output_tokens: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_call_fails_with_the_remediation_message() {
        let model = UnavailableModel::new("OpenAI", "export OPENAI_API_KEY");
        let err = model
            .generate_with_history(&[ChatMessage::user("hi")], None)
            .await
            .unwrap_err();
        match err {
            LlmError::MissingApiKey(message) => assert_eq!(message, "export OPENAI_API_KEY"),
            other => panic!("expected MissingApiKey, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn from_error_unwraps_missing_api_key() {
        let model = UnavailableModel::from_error(
            "Google",
            LlmError::MissingApiKey("set GOOGLE_API_KEY".to_string()),
        );
        let err = model.generate("hi", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing API key: set GOOGLE_API_KEY");
    }

    #[test]
    fn model_info_marks_the_provider_unconfigured() {
        let model = UnavailableModel::new("Google", "set GOOGLE_API_KEY");
        let info = model.model_info();
        assert_eq!(info.name, "(unconfigured)");
        assert_eq!(info.organization, "Google");
        assert_eq!(model.model_info(), info);
    }
}
