//! Per-session conversation state.

use serde::{Deserialize, Serialize};

use crate::types::{ChatMessage, MessageRole, ProviderId};

/// The shared transcript plus routing state for one session.
///
/// Created empty at session start, mutated in place by the turn executor,
/// discarded when the session ends. One instance per active session; the
/// state is not designed for concurrent mutation, so callers serialize
/// turns against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    /// Provider that will handle the next turn.
    pub active_provider: ProviderId,
    /// Optional instruction sent with every request.
    pub system_instruction: Option<String>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Create an empty conversation. The first turn goes to OpenAI, matching
    /// the alternation policy's starting point.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            active_provider: ProviderId::OpenAi,
            system_instruction: None,
        }
    }

    /// The transcript in chronological insertion order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append a message. Messages are never mutated or reordered afterwards.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Replace the transcript wholesale, e.g. after loading saved history.
    pub fn replace_messages(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    /// Drop the transcript; routing state and system instruction survive.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Override which provider handles the next turn.
    ///
    /// The override applies to the next turn only: after that turn succeeds
    /// the executor flips the provider again, so alternation resumes from
    /// the overridden point.
    pub fn set_active_provider(&mut self, provider: ProviderId) {
        self.active_provider = provider;
    }

    /// Set or clear the system instruction for subsequent turns.
    pub fn set_system_instruction(&mut self, instruction: Option<String>) {
        self.system_instruction = instruction.filter(|s| !s.trim().is_empty());
    }

    /// Number of completed turns (user/assistant pairs).
    pub fn turn_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::Assistant)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_with_openai_active() {
        let conv = Conversation::new();
        assert!(conv.messages().is_empty());
        assert_eq!(conv.active_provider, ProviderId::OpenAi);
        assert!(conv.system_instruction.is_none());
    }

    #[test]
    fn blank_system_instruction_is_treated_as_absent() {
        let mut conv = Conversation::new();
        conv.set_system_instruction(Some("   ".to_string()));
        assert!(conv.system_instruction.is_none());
        conv.set_system_instruction(Some("be terse".to_string()));
        assert_eq!(conv.system_instruction.as_deref(), Some("be terse"));
    }

    #[test]
    fn turn_count_counts_assistant_messages() {
        let mut conv = Conversation::new();
        conv.push(ChatMessage::user("a"));
        conv.push(ChatMessage::assistant("b"));
        conv.push(ChatMessage::user("c"));
        assert_eq!(conv.turn_count(), 1);
    }
}
