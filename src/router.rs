//! Provider routing.
//!
//! The original system modeled this as a conditional-edge graph; a pure
//! function pair reproduces identical behavior.

use crate::conversation::Conversation;
use crate::types::ProviderId;

/// Pick the provider for the turn about to execute. Deterministic, total,
/// pure: the conversation's `active_provider` is returned unchanged.
/// Alternation happens *after* each successful turn, never based on content.
pub fn route(conversation: &Conversation) -> ProviderId {
    conversation.active_provider
}

/// The alternation policy: the provider for the following turn.
pub fn next_provider(current: ProviderId) -> ProviderId {
    current.toggle()
}
