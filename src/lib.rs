//! tandem-chat
//!
//! A conversational front-end that alternates user turns between two
//! externally hosted LLM providers — an OpenAI-style chat-completions API
//! and a Gemini-style generateContent API — over a single shared transcript.
//!
//! # Example
//!
//! ```rust,ignore
//! use tandem_chat::prelude::*;
//!
//! let config = Config::from_env()?;
//! let executor = TurnExecutor::new(
//!     Box::new(OpenAiClient::new(config.openai)?),
//!     Box::new(GeminiClient::new(config.gemini)?),
//! );
//! let mut conversation = Conversation::new();
//! if let Some(reply) = executor.execute_turn(&mut conversation, "hello").await? {
//!     println!("{reply}");
//! }
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod conversation;
pub mod error;
pub mod executor;
pub mod history;
pub mod providers;
pub mod router;
pub mod traits;
pub mod types;

pub use error::LlmError;

/// Common imports for applications built on this crate.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::conversation::Conversation;
    pub use crate::error::LlmError;
    pub use crate::executor::TurnExecutor;
    pub use crate::history::{format_transcript, load_history, save_history};
    pub use crate::providers::{
        GeminiClient, GeminiConfig, OpenAiClient, OpenAiConfig, UnavailableModel,
    };
    pub use crate::traits::ChatModel;
    pub use crate::types::{ChatMessage, MessageRole, ModelInfo, ProviderId};
}
