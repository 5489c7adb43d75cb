//! Gateway to the external vision/text-generation service.
//!
//! This module provides:
//! - `AiClient` trait for abstracting the model provider
//! - `HttpAiClient`, one OpenAI-compatible HTTP transport
//! - `FakeClient` for deterministic tests without network access
//! - Configuration via environment variables
//! - The three gateway operations: identify, generate, search
//!
//! # Configuration
//!
//! Set these environment variables:
//!
//! - `SKILLET_API_KEY` (required): API key for the model provider
//! - `SKILLET_AI_MODEL` (optional): Model name, e.g. "openai/gpt-4o"
//! - `SKILLET_AI_BASE_URL` (optional): OpenAI-compatible API base URL
//!
//! # Example
//!
//! ```ignore
//! use skillet::ai::{identify_ingredients, HttpAiClient, ImageData};
//! use skillet::types::Language;
//!
//! let client = HttpAiClient::from_env()?;
//! let image = ImageData::from_data_url("data:image/jpeg;base64,...");
//! let ingredients = identify_ingredients(&client, &image, Language::En).await?;
//! ```

mod client;
mod config;
mod fake;
mod generate;
mod identify;
mod parse;
pub mod prompts;
mod search;
mod types;

pub use client::{AiClient, HttpAiClient};
pub use config::{AiConfig, ConfigError};
pub use fake::FakeClient;
pub use generate::generate_styled_recipe;
pub use identify::identify_ingredients;
pub use parse::{extract_json, parse_response};
pub use search::{search_popular_recipes, SEARCH_RESULT_COUNT};
pub use types::{ChatMessage, ChatRequest, ChatResponse, ImageData, Role};
