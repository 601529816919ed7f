//! Google Gemini adapter.
//!
//! Maps the unified transcript onto the `generateContent` wire format
//! (<https://ai.google.dev/api/generate-content>). Gemini has no system
//! role inside `contents`: the assistant role becomes `"model"`, and the
//! system instruction (plus any system-role transcript messages) goes into
//! the dedicated `systemInstruction` field.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::traits::ChatModel;
use crate::types::{ChatMessage, MessageRole, ModelInfo};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Gemini-specific configuration parameters
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication
    pub api_key: SecretString,
    /// Base URL for the Gemini API
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

impl GeminiConfig {
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

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Gemini client implementing [`ChatModel`]
#[derive(Debug)]
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: HttpClient,
}

impl GeminiClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails with [`LlmError::MissingApiKey`] when the key is empty, before
    /// any remote call is attempted.
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(LlmError::MissingApiKey(
                "Google API key is not set. Export GOOGLE_API_KEY or pass it to GeminiConfig::new"
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

    /// Build the request body. System-role transcript messages are folded
    /// into `systemInstruction` together with the explicit instruction,
    /// since Gemini rejects a system role inside `contents`.
    fn build_request(&self, messages: &[ChatMessage], system: Option<&str>) -> GenerateContentRequest {
        let mut instruction_parts: Vec<Part> = Vec::new();
        if let Some(instruction) = system {
            if !instruction.is_empty() {
                instruction_parts.push(Part {
                    text: instruction.to_string(),
                });
            }
        }

        let mut contents = Vec::with_capacity(messages.len());
        for message in messages {
            match message.role {
                MessageRole::System => instruction_parts.push(Part {
                    text: message.content.clone(),
                }),
                MessageRole::User => contents.push(Content {
                    role: Some("user".to_string()),
                    parts: vec![Part {
                        text: message.content.clone(),
                    }],
                }),
                MessageRole::Assistant => contents.push(Content {
                    role: Some("model".to_string()),
                    parts: vec![Part {
                        text: message.content.clone(),
                    }],
                }),
            }
        }

        GenerateContentRequest {
            contents,
            system_instruction: if instruction_parts.is_empty() {
                None
            } else {
                Some(Content {
                    role: None,
                    parts: instruction_parts,
                })
            },
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
            },
        }
    }

    /// Extract a human-readable message from a Gemini error body.
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
impl ChatModel for GeminiClient {
    async fn generate_with_history(
        &self,
        messages: &[ChatMessage],
        system: Option<&str>,
    ) -> Result<String, LlmError> {
        let request = self.build_request(messages, system);

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        tracing::debug!(model = %self.config.model, contents = request.contents.len(), "dispatching Gemini chat request");

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", self.config.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = Self::error_message(&body);
            tracing::warn!(status = status.as_u16(), %message, "Gemini request failed");
            return Err(LlmError::from_status(status.as_u16(), message));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(format!("invalid generateContent body: {e}")))?;

        // Long responses legitimately arrive split across several parts;
        // the response text is their concatenation.
        body.candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| LlmError::ParseError("no text candidate in response".to_string()))
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: self.config.model.clone(),
            organization: "Google".to_string(),
            default_temperature: self.config.temperature,
            max_output_tokens: self.config.max_tokens,
        }
    }
}
