//! Prompt templates for styled single-recipe generation.

use super::language_instruction;
use crate::types::{ChefMode, Language};

pub const GENERATE_PROMPT_NAME: &str = "generate_styled_recipe";

/// Response-shape hint for a single generated recipe.
pub const RECIPE_SCHEMA_HINT: &str = r#"{
  "title": "string (creative name of the dish)",
  "description": "string (short engaging description)",
  "ingredientsDetected": ["string (ingredients used)"],
  "steps": ["string (step by step instructions)"],
  "cookingTime": "string",
  "difficulty": "string",
  "chefComment": "string (chef's specific comment)"
}"#;

/// The fixed persona instruction for a styled generation. The popular-search
/// mode has no persona; anything that is not the refined persona gets the
/// chaotic one, mirroring the two-way branch at the confirm boundary.
fn persona(mode: ChefMode) -> &'static str {
    match mode {
        ChefMode::Michelin => {
            "You are a world-renowned 3-star Michelin Chef. Use flowery, expensive-sounding culinary terms."
        }
        _ => {
            "You are a chaotic 'Dark Cuisine' Chef (The Hell Kitchen Alchemist). Be dramatic, funny, and unconventional."
        }
    }
}

pub fn render_generate_prompt(
    selected_ingredients: &[String],
    mode: ChefMode,
    language: Language,
) -> String {
    format!(
        r#"{persona}
The user wants to cook a dish using MAINLY these ingredients found in their fridge: [{ingredients}].
Analyze the provided image for context (quantity, quality) but focus on the selected ingredients.
Create a recipe.
{lang}"#,
        persona = persona(mode),
        ingredients = selected_ingredients.join(", "),
        lang = language_instruction(language),
    )
}
