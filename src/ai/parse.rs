//! Response parsing at the gateway boundary.
//!
//! Model responses are free-form text expected to contain JSON, sometimes
//! wrapped in a markdown code fence despite instructions not to. Everything
//! crossing into the domain model goes through a strict typed parse here;
//! malformed JSON is a hard failure of the call.

use serde::de::DeserializeOwned;

use crate::error::GatewayError;

/// Extract the JSON portion of a model response.
///
/// Extraction order:
/// 1. ```` ```json ... ``` ```` block
/// 2. bare ```` ``` ... ``` ```` block
/// 3. raw `{...}` object or `[...]` array
pub fn extract_json(response: &str) -> Result<&str, GatewayError> {
    if let Some(marker) = response.find("```json") {
        let start = marker + "```json".len();
        if let Some(end) = response[start..].find("```") {
            return Ok(response[start..start + end].trim());
        }
    }

    if let Some(marker) = response.find("```") {
        let start = marker + "```".len();
        if let Some(end) = response[start..].find("```") {
            return Ok(response[start..start + end].trim());
        }
    }

    let open = response.find(|c| c == '{' || c == '[');
    let close = response.rfind(|c| c == '}' || c == ']');
    if let (Some(start), Some(end)) = (open, close) {
        if end >= start {
            return Ok(&response[start..=end]);
        }
    }

    Err(GatewayError::Parse("no JSON found in response".to_string()))
}

/// Extract and parse a model response into a typed value.
pub fn parse_response<T: DeserializeOwned>(response: &str) -> Result<T, GatewayError> {
    let json = extract_json(response)?;
    serde_json::from_str(json).map_err(|e| GatewayError::Parse(e.to_string()))
}
