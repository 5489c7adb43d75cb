//! Gateway client trait and the HTTP transport.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::config::AiConfig;
use super::types::{ChatRequest, ChatResponse, Role};
use crate::error::GatewayError;

/// Trait for gateway clients.
///
/// Implementations should be stateless and thread-safe. The `prompt_name`
/// identifies the operation for logging; it does not affect the request.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Send a chat request and return the model's text response.
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, GatewayError>;
}

/// HTTP client for any OpenAI-compatible chat-completions endpoint.
pub struct HttpAiClient {
    http: reqwest::Client,
    config: AiConfig,
}

/// Wire request format.
#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    content: ApiContent,
}

/// Plain text, or multipart text + images for vision requests.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ApiContent {
    Text(String),
    Parts(Vec<ApiContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiContentPart {
    Text { text: String },
    ImageUrl { image_url: ApiImageUrl },
}

#[derive(Debug, Serialize)]
struct ApiImageUrl {
    url: String,
}

/// Wire response format.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
}

impl HttpAiClient {
    /// Create a client from environment configuration.
    pub fn from_env() -> Result<Self, GatewayError> {
        let config = AiConfig::from_env().map_err(|e| GatewayError::NotConfigured(e.to_string()))?;
        Ok(Self::new(config))
    }

    /// Create a client with the given configuration.
    pub fn new(config: AiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn to_api_request(&self, request: &ChatRequest) -> ApiRequest {
        let messages = request
            .messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                let content = if msg.images.is_empty() {
                    ApiContent::Text(msg.content.clone())
                } else {
                    let mut parts = vec![ApiContentPart::Text {
                        text: msg.content.clone(),
                    }];
                    parts.extend(msg.images.iter().map(|img| ApiContentPart::ImageUrl {
                        image_url: ApiImageUrl {
                            url: img.data_url.clone(),
                        },
                    }));
                    ApiContent::Parts(parts)
                };
                ApiMessage { role, content }
            })
            .collect();

        ApiRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl AiClient for HttpAiClient {
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, GatewayError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let api_request = self.to_api_request(&request);

        tracing::debug!(
            prompt_name = prompt_name,
            model = %self.config.model,
            "calling chat completions API"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(GatewayError::Api {
                status,
                message: body,
            });
        }

        let api_response: ApiResponse =
            serde_json::from_str(&body).map_err(|e| GatewayError::Parse(e.to_string()))?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(GatewayError::EmptyResponse)?;

        Ok(ChatResponse { content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::{ChatMessage, ImageData};

    fn client() -> HttpAiClient {
        HttpAiClient::new(AiConfig {
            api_key: "test-key".to_string(),
            model: "openai/gpt-4o".to_string(),
            base_url: "http://localhost:9".to_string(),
        })
    }

    #[test]
    fn test_text_message_serializes_as_plain_string() {
        let request = ChatRequest {
            messages: vec![ChatMessage::system("hint")],
            ..Default::default()
        };
        let api = client().to_api_request(&request);
        let json = serde_json::to_string(&api).unwrap();

        assert!(json.contains(r#""role":"system""#));
        assert!(json.contains(r#""content":"hint""#));
    }

    #[test]
    fn test_image_message_serializes_as_parts() {
        let image = ImageData::from_data_url("data:image/jpeg;base64,AAAA");
        let request = ChatRequest {
            messages: vec![ChatMessage::user_with_images("look", vec![image])],
            ..Default::default()
        };
        let api = client().to_api_request(&request);
        let json = serde_json::to_string(&api).unwrap();

        assert!(json.contains(r#""type":"text""#));
        assert!(json.contains(r#""type":"image_url""#));
        assert!(json.contains("data:image/jpeg;base64,AAAA"));
    }
}
