//! Prompt template for popular-recipe search.

use super::language_instruction;
use crate::types::Language;

pub const SEARCH_PROMPT_NAME: &str = "search_popular_recipes";

/// Response-shape hint for the search call.
pub const SEARCH_SCHEMA_HINT: &str = r#"{
  "recipes": [
    {
      "title": "string",
      "description": "string",
      "ingredientsDetected": ["string"],
      "steps": ["string"],
      "cookingTime": "string",
      "difficulty": "string",
      "chefComment": "string"
    }
  ]
}"#;

pub fn render_search_prompt(
    selected_ingredients: &[String],
    result_count: usize,
    language: Language,
) -> String {
    format!(
        r#"Act as a search engine and recipe aggregator.
Find {result_count} DISTINCT, POPULAR, and PRACTICAL recipes that can be made primarily with these ingredients: [{ingredients}].
These should be normal, real-world recipes that people actually cook.
For each recipe, provide detailed steps, cooking time, and difficulty.
In the 'chefComment' field, provide a brief sentence about why this recipe is popular.
{lang}"#,
        ingredients = selected_ingredients.join(", "),
        lang = language_instruction(language),
    )
}
