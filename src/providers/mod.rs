//! Provider adapters.
//!
//! Each submodule wraps one remote chat-completion API behind the
//! [`crate::traits::ChatModel`] contract.

pub mod gemini;
pub mod openai;
pub mod unavailable;

pub use gemini::{GeminiClient, GeminiConfig};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use unavailable::UnavailableModel;
