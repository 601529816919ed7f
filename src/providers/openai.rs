//! OpenAI chat-completions adapter.
//!
//! Maps the unified transcript onto the Chat Completions wire format
//! (<https://platform.openai.com/docs/api-reference/chat>). The system
//! instruction, when present, is inserted as the leading `system` message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::traits::ChatModel;
use crate::types::{ChatMessage, MessageRole, ModelInfo};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";

/// OpenAI-specific configuration parameters
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication
    pub api_key: SecretString,
    /// Base URL for the OpenAI API
    pub base_url: String,
    /// Model to use
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum number of output tokens
    pub max_tokens: u32,
    /// HTTP timeout in seconds
    pub timeout: Option<u64>,
}

impl OpenAiConfig {
    /// Create a new configuration with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            timeout: Some(30),
        }
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the sampling temperature
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output token cap
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the HTTP timeout in seconds
    pub const fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI client implementing [`ChatModel`]
#[derive(Debug)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    http_client: HttpClient,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails with [`LlmError::MissingApiKey`] when the key is empty, before
    /// any remote call is attempted.
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(LlmError::MissingApiKey(
                "OpenAI API key is not set. Export OPENAI_API_KEY or pass it to OpenAiConfig::new"
                    .to_string(),
            ));
        }

        let timeout = Duration::from_secs(config.timeout.unwrap_or(30));
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                LlmError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Build the wire-format message list: system instruction first, then
    /// the transcript in order.
    fn build_messages<'a>(
        messages: &'a [ChatMessage],
        system: Option<&'a str>,
    ) -> Vec<WireMessage<'a>> {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        if let Some(instruction) = system {
            if !instruction.is_empty() {
                wire.push(WireMessage {
                    role: "system",
                    content: instruction,
                });
            }
        }
        for message in messages {
            wire.push(WireMessage {
                role: match message.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                },
                content: &message.content,
            });
        }
        wire
    }

    /// Extract a human-readable message from an OpenAI error body.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.pointer("/error/message")
                    .and_then(|m| m.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn generate_with_history(
        &self,
        messages: &[ChatMessage],
        system: Option<&str>,
    ) -> Result<String, LlmError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: Self::build_messages(messages, system),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        tracing::debug!(model = %self.config.model, messages = request.messages.len(), "dispatching OpenAI chat request");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = Self::error_message(&body);
            tracing::warn!(status = status.as_u16(), %message, "OpenAI request failed");
            return Err(LlmError::from_status(status.as_u16(), message));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(format!("invalid chat completion body: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::ParseError("no message content in completion".to_string()))
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: self.config.model.clone(),
            organization: "OpenAI".to_string(),
            default_temperature: self.config.temperature,
            max_output_tokens: self.config.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_instruction_leads_the_message_list() {
        let messages = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
        let wire = OpenAiClient::build_messages(&messages, Some("be terse"));
        assert_eq!(wire.len(), 3);
        assert_eq!(wire[0].role, "system");
        assert_eq!(wire[0].content, "be terse");
        assert_eq!(wire[1].role, "user");
        assert_eq!(wire[2].role, "assistant");
    }

    #[test]
    fn empty_system_instruction_is_skipped() {
        let messages = vec![ChatMessage::user("hi")];
        let wire = OpenAiClient::build_messages(&messages, Some(""));
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0].role, "user");
    }

    #[test]
    fn empty_api_key_is_rejected_at_construction() {
        let err = OpenAiClient::new(OpenAiConfig::new("")).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey(_)));
    }

    #[test]
    fn error_message_prefers_structured_body() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(
            OpenAiClient::error_message(body),
            "Incorrect API key provided"
        );
        assert_eq!(OpenAiClient::error_message("plain text"), "plain text");
    }
}
