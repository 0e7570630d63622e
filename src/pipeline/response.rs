//! Model response handling: locate the JSON payload in whatever prose the
//! model wrapped around it, then parse it leniently into the typed
//! document.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ExtractionError;
use crate::models::{collapse_metadata, PidDocument};

/// Extract the JSON object from a raw model response.
///
/// Fenced ```json blocks win; otherwise the outermost brace-delimited
/// span is taken. Returns `None` when no candidate object exists.
pub fn extract_json_block(response: &str) -> Option<String> {
    if let Some(fence_start) = response.find("```json") {
        let content_start = fence_start + 7;
        if let Some(fence_len) = response[content_start..].find("```") {
            return Some(response[content_start..content_start + fence_len].trim().to_string());
        }
    }

    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(response[start..=end].to_string())
}

/// Parse the model's response text into a [`PidDocument`].
///
/// Item arrays are parsed leniently: an element that fails to deserialize
/// is skipped (and logged), never fatal. A response without a JSON object,
/// or whose JSON is not an object at the top level, is an error.
pub fn parse_document(response: &str) -> Result<PidDocument, ExtractionError> {
    let json_str = extract_json_block(response).ok_or_else(|| {
        ExtractionError::MalformedResponse("No JSON object found in response".into())
    })?;

    let value: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractionError::JsonParsing(e.to_string()))?;

    let Value::Object(mut map) = value else {
        return Err(ExtractionError::MalformedResponse(
            "Top-level JSON is not an object".into(),
        ));
    };

    let metadata = map
        .remove("metadata")
        .map(collapse_metadata)
        .unwrap_or_default();

    Ok(PidDocument {
        metadata,
        equipment: parse_array_lenient("equipment", map.remove("equipment")),
        instrumentation: parse_array_lenient("instrumentation", map.remove("instrumentation")),
        lines: parse_array_lenient("lines", map.remove("lines")),
        valves: parse_array_lenient("valves", map.remove("valves")),
        junctions: parse_array_lenient("junctions", map.remove("junctions")),
        control_relationships: parse_array_lenient(
            "control_relationships",
            map.remove("control_relationships"),
        ),
        annotations: parse_array_lenient("annotations", map.remove("annotations")),
        safety_devices: parse_array_lenient("safety_devices", map.remove("safety_devices")),
        unrecognized_symbols: parse_array_lenient(
            "unrecognized_symbols",
            map.remove("unrecognized_symbols"),
        ),
    })
}

/// Parse a category array, skipping elements that fail to deserialize.
fn parse_array_lenient<T: DeserializeOwned>(category: &str, value: Option<Value>) -> Vec<T> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();

    if parsed.len() < total {
        tracing::warn!(
            category,
            skipped = total - parsed.len(),
            "Skipped undecodable items in model output"
        );
    }
    parsed
}
