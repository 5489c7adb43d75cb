//! Ingredient identification from a photo using vision AI.

use serde::Deserialize;

use super::client::AiClient;
use super::parse::parse_response;
use super::prompts::identify::{
    render_identify_prompt, IDENTIFY_PROMPT_NAME, IDENTIFY_SCHEMA_HINT,
};
use super::prompts::render_system_prompt;
use super::types::{ChatMessage, ChatRequest, ImageData};
use crate::error::GatewayError;
use crate::types::{DetectedIngredient, Language};

#[derive(Debug, Deserialize)]
struct IdentifyResponse {
    #[serde(default)]
    ingredients: Vec<DetectedIngredient>,
}

/// Identify the edible ingredients visible in an image.
///
/// Tolerates the model omitting `box_2d` (name-only match). Bounding boxes
/// are normalized unconditionally: the model does not guarantee min/max
/// ordering within a pair, so inverted pairs are swapped here rather than in
/// each consumer. Entries without a name are dropped.
pub async fn identify_ingredients(
    client: &dyn AiClient,
    image: &ImageData,
    language: Language,
) -> Result<Vec<DetectedIngredient>, GatewayError> {
    let prompt = render_identify_prompt(language);
    let request = ChatRequest {
        messages: vec![
            ChatMessage::system(render_system_prompt(IDENTIFY_SCHEMA_HINT)),
            ChatMessage::user_with_images(prompt, vec![image.clone()]),
        ],
        max_tokens: Some(4000),
        temperature: Some(0.7),
    };

    let response = client.complete(IDENTIFY_PROMPT_NAME, request).await?;
    let parsed: IdentifyResponse = parse_response(&response.content)?;

    Ok(parsed
        .ingredients
        .into_iter()
        .filter(|i| !i.name.trim().is_empty())
        .map(normalize_box)
        .collect())
}

fn normalize_box(mut ingredient: DetectedIngredient) -> DetectedIngredient {
    if let Some([ymin, xmin, ymax, xmax]) = ingredient.box_2d.as_mut() {
        if *ymin > *ymax {
            std::mem::swap(ymin, ymax);
        }
        if *xmin > *xmax {
            std::mem::swap(xmin, xmax);
        }
    }
    ingredient
}
