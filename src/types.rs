//! Core chat types: message roles, messages, provider identifiers and
//! static model descriptors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Message role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A single transcript entry.
///
/// Messages are immutable once created: the conversation appends them and
/// never mutates or reorders them afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Role
    pub role: MessageRole,
    /// Plain-text content
    pub content: String,
}

impl ChatMessage {
    /// Creates a user message
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    /// Creates a system message
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Identifies one of the two configured providers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAi,
    Gemini,
}

impl ProviderId {
    /// The other provider. This is the whole alternation policy: a binary
    /// flip, independent of message content.
    pub const fn toggle(self) -> Self {
        match self {
            Self::OpenAi => Self::Gemini,
            Self::Gemini => Self::OpenAi,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

impl FromStr for ProviderId {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "chatgpt" | "gpt" => Ok(Self::OpenAi),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(LlmError::InvalidInput(format!(
                "unknown provider '{other}', expected 'openai' or 'gemini'"
            ))),
        }
    }
}

/// Static metadata describing a model adapter instance.
///
/// Fixed at client construction and never mutated afterwards, so
/// [`crate::traits::ChatModel::model_info`] is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    /// Model name, e.g. `gpt-4o` or `gemini-1.5-pro`
    pub name: String,
    /// Operating organization, e.g. `OpenAI` or `Google`
    pub organization: String,
    /// Sampling temperature sent with each request
    pub default_temperature: f32,
    /// Output token cap sent with each request
    pub max_output_tokens: u32,
}
