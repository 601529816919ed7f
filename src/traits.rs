//! The capability contract implemented by every model adapter.

use async_trait::async_trait;

use crate::error::LlmError;
use crate::types::{ChatMessage, ModelInfo};

/// Uniform chat capability over one remote provider.
///
/// Both adapters behave identically at this level; the endpoint, credential
/// and wire format behind each one are opaque to callers, which never branch
/// on the concrete type.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Single-turn completion. The default implementation delegates to
    /// [`ChatModel::generate_with_history`] with a one-message transcript.
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        let messages = vec![ChatMessage::user(prompt)];
        self.generate_with_history(&messages, system).await
    }

    /// Translates the full message sequence (plus the system instruction,
    /// if present) into the provider's wire format, issues one remote call
    /// and returns the response text. Failures propagate as-is, no retry.
    async fn generate_with_history(
        &self,
        messages: &[ChatMessage],
        system: Option<&str>,
    ) -> Result<String, LlmError>;

    /// Static metadata for this adapter instance. Never fails, no side
    /// effects, idempotent.
    fn model_info(&self) -> ModelInfo;
}
