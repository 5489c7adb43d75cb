//! Styled single-recipe generation.

use super::client::AiClient;
use super::parse::parse_response;
use super::prompts::generate::{
    render_generate_prompt, GENERATE_PROMPT_NAME, RECIPE_SCHEMA_HINT,
};
use super::prompts::render_system_prompt;
use super::types::{ChatMessage, ChatRequest, ImageData};
use crate::error::GatewayError;
use crate::types::{ChefMode, Language, RecipeDraft};

/// Generate one styled recipe from the image and the confirmed ingredient
/// selection. `mode` picks the persona (refined or chaotic).
///
/// Returns a draft: the workflow, not the gateway, assigns id, timestamp,
/// and bookkeeping fields.
pub async fn generate_styled_recipe(
    client: &dyn AiClient,
    image: &ImageData,
    selected_ingredients: &[String],
    mode: ChefMode,
    language: Language,
) -> Result<RecipeDraft, GatewayError> {
    let prompt = render_generate_prompt(selected_ingredients, mode, language);
    let request = ChatRequest {
        messages: vec![
            ChatMessage::system(render_system_prompt(RECIPE_SCHEMA_HINT)),
            ChatMessage::user_with_images(prompt, vec![image.clone()]),
        ],
        max_tokens: Some(4000),
        temperature: Some(0.7),
    };

    let response = client.complete(GENERATE_PROMPT_NAME, request).await?;
    parse_response(&response.content)
}
