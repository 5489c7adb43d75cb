//! Prompt template for identifying ingredients in a photo.

use crate::types::Language;

pub const IDENTIFY_PROMPT_NAME: &str = "identify_ingredients";

/// Response-shape hint for the identify call.
pub const IDENTIFY_SCHEMA_HINT: &str = r#"{
  "ingredients": [
    {
      "name": "string (name of ingredient)",
      "box_2d": [ymin, xmin, ymax, xmax] (numbers 0-1)
    }
  ]
}"#;

pub fn render_identify_prompt(language: Language) -> String {
    let lang_instruction = match language {
        Language::En => "in English",
        Language::Zh => "in Simplified Chinese (zh-CN)",
    };

    format!(
        r#"Identify the main edible ingredients in this image.
Return a list of ingredients with their 2D bounding boxes.

1. 'name': Common name of the ingredient {lang_instruction}.
2. 'box_2d': [ymin, xmin, ymax, xmax] (0-1).

Guidelines:
- ACCURACY IS CRITICAL. Identify ingredients precisely.
- Group similar items: If there are multiple items of the same kind return ONE bounding box for the whole group.
- Reduce clutter: Avoid overlapping boxes for the same object.
- Only identify food ingredients. Ignore background objects."#
    )
}
