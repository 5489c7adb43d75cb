//! Prompt templates for the gateway operations.

pub mod generate;
pub mod identify;
pub mod search;

use crate::types::Language;

/// Shared system preamble: instructs the model to answer with raw JSON in
/// the given shape, no prose and no code fences.
pub fn render_system_prompt(schema_hint: &str) -> String {
    format!(
        r#"You are an AI assistant capable of analyzing images and generating recipes.
IMPORTANT: You must reply in VALID JSON format only.
Do not include any explanation, apology, or markdown code blocks (like ```json).
Just return the raw JSON string.

The expected JSON structure is:
{schema_hint}"#
    )
}

/// Output-language instruction appended to every user prompt.
pub fn language_instruction(language: Language) -> &'static str {
    match language {
        Language::En => "IMPORTANT: Output all text content in English.",
        Language::Zh => {
            "IMPORTANT: Output all text content (title, description, steps, etc.) in Simplified Chinese (zh-CN)."
        }
    }
}
