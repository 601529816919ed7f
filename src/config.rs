//! Environment-driven configuration.
//!
//! Recognized variables: `OPENAI_API_KEY`, `GOOGLE_API_KEY`, `OPENAI_MODEL`,
//! `GEMINI_MODEL`, `LLM_TEMPERATURE`, `LLM_MAX_TOKENS`. A missing key is
//! fatal only for the affected provider; it is detected here, before any
//! remote call is attempted.

use std::env;

use crate::error::LlmError;
use crate::providers::{GeminiConfig, OpenAiConfig};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Resolved configuration for both providers.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai: OpenAiConfig,
    pub gemini: GeminiConfig,
}

impl Config {
    /// Build a configuration from the process environment.
    ///
    /// Keys may be empty here; client construction rejects an empty key with
    /// [`LlmError::MissingApiKey`], so a session can still run against the
    /// provider whose key is present.
    pub fn from_env() -> Result<Self, LlmError> {
        let temperature = match env::var("LLM_TEMPERATURE") {
            Ok(raw) => {
                let value: f32 = raw.parse().map_err(|_| LlmError::InvalidParameter {
                    name: "LLM_TEMPERATURE".to_string(),
                    message: format!("'{raw}' is not a number"),
                })?;
                validate_temperature(value)?
            }
            Err(_) => DEFAULT_TEMPERATURE,
        };

        let max_tokens = match env::var("LLM_MAX_TOKENS") {
            Ok(raw) => {
                let value: u32 = raw.parse().map_err(|_| LlmError::InvalidParameter {
                    name: "LLM_MAX_TOKENS".to_string(),
                    message: format!("'{raw}' is not a positive integer"),
                })?;
                validate_max_tokens(value)?
            }
            Err(_) => DEFAULT_MAX_TOKENS,
        };

        let openai_model =
            env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string());
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());

        let openai = OpenAiConfig::new(env::var("OPENAI_API_KEY").unwrap_or_default())
            .with_model(openai_model)
            .with_temperature(temperature)
            .with_max_tokens(max_tokens);
        let gemini = GeminiConfig::new(env::var("GOOGLE_API_KEY").unwrap_or_default())
            .with_model(gemini_model)
            .with_temperature(temperature)
            .with_max_tokens(max_tokens);

        Ok(Self { openai, gemini })
    }
}

/// Temperature must lie in `[0, 2]`.
pub fn validate_temperature(value: f32) -> Result<f32, LlmError> {
    if (0.0..=2.0).contains(&value) {
        Ok(value)
    } else {
        Err(LlmError::InvalidParameter {
            name: "LLM_TEMPERATURE".to_string(),
            message: format!("{value} is outside [0, 2]"),
        })
    }
}

/// Max tokens must be positive.
pub fn validate_max_tokens(value: u32) -> Result<u32, LlmError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(LlmError::InvalidParameter {
            name: "LLM_MAX_TOKENS".to_string(),
            message: "must be positive".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_bounds() {
        assert!(validate_temperature(0.0).is_ok());
        assert!(validate_temperature(2.0).is_ok());
        assert!(validate_temperature(-0.1).is_err());
        assert!(validate_temperature(2.1).is_err());
    }

    #[test]
    fn max_tokens_must_be_positive() {
        assert!(validate_max_tokens(1).is_ok());
        assert!(matches!(
            validate_max_tokens(0),
            Err(LlmError::InvalidParameter { .. })
        ));
    }
}
