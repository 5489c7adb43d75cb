//! Popular-recipe search by ingredient list.

use serde::Deserialize;

use super::client::AiClient;
use super::parse::parse_response;
use super::prompts::render_system_prompt;
use super::prompts::search::{render_search_prompt, SEARCH_PROMPT_NAME, SEARCH_SCHEMA_HINT};
use super::types::{ChatMessage, ChatRequest};
use crate::error::GatewayError;
use crate::types::{Language, RecipeDraft};

/// How many recipes a search requests. The gateway may return fewer.
pub const SEARCH_RESULT_COUNT: usize = 4;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    recipes: Vec<RecipeDraft>,
}

/// Search for popular real-world recipes matching the confirmed ingredient
/// selection. Text-only; no image is sent.
pub async fn search_popular_recipes(
    client: &dyn AiClient,
    selected_ingredients: &[String],
    language: Language,
) -> Result<Vec<RecipeDraft>, GatewayError> {
    let prompt = render_search_prompt(selected_ingredients, SEARCH_RESULT_COUNT, language);
    let request = ChatRequest {
        messages: vec![
            ChatMessage::system(render_system_prompt(SEARCH_SCHEMA_HINT)),
            ChatMessage::user(prompt),
        ],
        max_tokens: Some(4000),
        temperature: Some(0.7),
    };

    let response = client.complete(SEARCH_PROMPT_NAME, request).await?;
    let parsed: SearchResponse = parse_response(&response.content)?;
    Ok(parsed.recipes)
}
