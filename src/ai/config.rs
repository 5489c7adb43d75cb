//! Gateway configuration from environment variables.

use std::env;
use thiserror::Error;

/// Default OpenAI-compatible base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model. Must be vision-capable for ingredient identification.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// Gateway client configuration. Model selection, endpoint, and auth are
/// configuration, not separate code paths.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key for the model provider.
    pub api_key: String,
    /// Model name (e.g. "openai/gpt-4o").
    pub model: String,
    /// Base URL for the OpenAI-compatible API.
    pub base_url: String,
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `SKILLET_API_KEY`: API key for the model provider
    ///
    /// Optional:
    /// - `SKILLET_AI_MODEL`: Model name (default: "openai/gpt-4o")
    /// - `SKILLET_AI_BASE_URL`: API base URL (default: OpenRouter)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("SKILLET_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("SKILLET_API_KEY".to_string()))?;

        let model = env::var("SKILLET_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            env::var("SKILLET_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            model,
            base_url,
        })
    }
}
