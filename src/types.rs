//! Core domain types shared across the workflow, collections, and gateway.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Chef mode selected by the user. Fixed at the moment ingredients are
/// confirmed; it decides which generation path runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChefMode {
    /// Refined 3-star persona, single styled recipe.
    #[serde(rename = "MICHELIN")]
    Michelin,
    /// Chaotic "dark cuisine" persona, single styled recipe.
    #[serde(rename = "HELL")]
    Hell,
    /// Multi-result search for popular real-world recipes.
    #[serde(rename = "POPULAR")]
    Popular,
}

impl ChefMode {
    /// True for the two styled single-recipe personas.
    pub fn is_persona(&self) -> bool {
        matches!(self, ChefMode::Michelin | ChefMode::Hell)
    }
}

/// Output language for prompts and the generic error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
}

impl Language {
    /// The one generic message surfaced for any gateway failure.
    pub fn gateway_error_message(&self) -> &'static str {
        match self {
            Language::En => "The chef could not be reached. Please try again.",
            Language::Zh => "无法联系到主厨，请重试。",
        }
    }

    /// The other locale. The UI exposes language as a two-way toggle.
    pub fn toggled(&self) -> Language {
        match self {
            Language::En => Language::Zh,
            Language::Zh => Language::En,
        }
    }
}

/// A user comment on a recipe. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    /// Creation time, epoch milliseconds.
    pub timestamp: i64,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// An ingredient detected in the uploaded image. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedIngredient {
    pub name: String,
    /// Bounding box as `[ymin, xmin, ymax, xmax]`, normalized to [0, 1].
    /// Absent when the model returns a name-only match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_2d: Option<[f32; 4]>,
}

/// Recipe fields as produced by the gateway, before the workflow assigns
/// identity and bookkeeping. The gateway never mints ids or timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Ingredients the model chose to use, in display order.
    #[serde(default)]
    pub ingredients_detected: Vec<String>,
    /// Instructions in execution order.
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub cooking_time: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub chef_comment: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A generated or retrieved dish record.
///
/// Display fields are fixed at creation; only `is_favorite`, `comments`,
/// `rating`, and `tags` are mutated afterwards, and only through the
/// collection model so every copy stays in sync. Serialized with camelCase
/// field names to match the stored JSON layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    /// Creation time, epoch milliseconds.
    pub timestamp: i64,
    pub title: String,
    pub description: String,
    pub ingredients_detected: Vec<String>,
    pub steps: Vec<String>,
    pub cooking_time: String,
    pub difficulty: String,
    pub chef_comment: String,
    #[serde(default)]
    pub is_favorite: bool,
    /// Newest first, append-only.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// 1-5, last write wins. Absent means unrated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Duplicate-free, insertion order preserved for display.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Recipe {
    /// Materialize a gateway draft into a full record, assigning a fresh id
    /// and creation time.
    pub fn from_draft(draft: RecipeDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now().timestamp_millis(),
            title: draft.title,
            description: draft.description,
            ingredients_detected: draft.ingredients_detected,
            steps: draft.steps,
            cooking_time: draft.cooking_time,
            difficulty: draft.difficulty,
            chef_comment: draft.chef_comment,
            is_favorite: false,
            comments: Vec::new(),
            rating: None,
            tags: draft.tags,
        }
    }

    /// Plain-text summary used by the share-to-clipboard control.
    pub fn share_text(&self) -> String {
        format!(
            "{}\n\n{}\n\nIngredients: {}\n\nSteps:\n{}",
            self.title,
            self.description,
            self.ingredients_detected.join(", "),
            self.steps.join("\n")
        )
    }
}
