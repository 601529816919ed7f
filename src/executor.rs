//! Turn execution: one user input in, one assistant response out.

use crate::conversation::Conversation;
use crate::error::LlmError;
use crate::router;
use crate::traits::ChatModel;
use crate::types::{ChatMessage, ModelInfo, ProviderId};

/// Drives a conversation one turn at a time across the two adapters.
///
/// Execution is synchronous request-per-turn: each call blocks on the remote
/// provider and returns before the next turn can begin.
pub struct TurnExecutor {
    openai: Box<dyn ChatModel>,
    gemini: Box<dyn ChatModel>,
}

impl TurnExecutor {
    /// Create an executor over the two adapters.
    pub fn new(openai: Box<dyn ChatModel>, gemini: Box<dyn ChatModel>) -> Self {
        Self { openai, gemini }
    }

    fn adapter(&self, provider: ProviderId) -> &dyn ChatModel {
        match provider {
            ProviderId::OpenAi => self.openai.as_ref(),
            ProviderId::Gemini => self.gemini.as_ref(),
        }
    }

    /// Static metadata for the adapter behind the given provider id.
    pub fn model_info(&self, provider: ProviderId) -> ModelInfo {
        self.adapter(provider).model_info()
    }

    /// Execute one turn.
    ///
    /// Empty or all-whitespace input is a silent no-op: `Ok(None)`, nothing
    /// appended, no provider call made.
    ///
    /// On success the user and assistant messages are appended, the active
    /// provider flips for the following turn and the response text is
    /// returned. On provider failure the user message stays committed, no
    /// assistant message is appended, the active provider is NOT advanced
    /// and the error propagates to the caller for display. No retries.
    pub async fn execute_turn(
        &self,
        conversation: &mut Conversation,
        user_input: &str,
    ) -> Result<Option<String>, LlmError> {
        if user_input.trim().is_empty() {
            return Ok(None);
        }

        conversation.push(ChatMessage::user(user_input));

        let provider = router::route(conversation);
        tracing::debug!(%provider, turn = conversation.turn_count() + 1, "executing turn");

        let response = self
            .adapter(provider)
            .generate_with_history(
                conversation.messages(),
                conversation.system_instruction.as_deref(),
            )
            .await?;

        conversation.push(ChatMessage::assistant(response.clone()));
        conversation.set_active_provider(router::next_provider(provider));

        Ok(Some(response))
    }
}
