//! The category-keyed drawing document.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::items::{
    Annotation, ControlRelationship, Equipment, Instrument, Junction, Line, SafetyDevice,
    UnrecognizedSymbol, Valve,
};

/// Drawing-level metadata. Always a single object: the vision model
/// sometimes wraps it in a one-element array, which the deserializer
/// collapses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DrawingMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default)]
    pub standards_referenced: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// The full extracted document: ten categories plus metadata.
///
/// Every field defaults, so all expected top-level keys exist after
/// deserialization regardless of what the model omitted, and all are
/// serialized back out (empty list / empty object when no data).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PidDocument {
    #[serde(deserialize_with = "metadata_object_or_array")]
    pub metadata: DrawingMetadata,
    pub equipment: Vec<Equipment>,
    pub instrumentation: Vec<Instrument>,
    pub lines: Vec<Line>,
    pub valves: Vec<Valve>,
    pub junctions: Vec<Junction>,
    pub control_relationships: Vec<ControlRelationship>,
    pub annotations: Vec<Annotation>,
    pub safety_devices: Vec<SafetyDevice>,
    pub unrecognized_symbols: Vec<UnrecognizedSymbol>,
}

/// Accept `metadata` as an object or an array of objects (first wins).
fn metadata_object_or_array<'de, D>(deserializer: D) -> Result<DrawingMetadata, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(collapse_metadata(value))
}

/// Collapse whatever the model produced under `metadata` into one object.
pub(crate) fn collapse_metadata(value: Value) -> DrawingMetadata {
    let object = match value {
        Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
        other => other,
    };
    match object {
        Value::Object(_) => serde_json::from_value(object).unwrap_or_default(),
        _ => DrawingMetadata::default(),
    }
}

impl PidDocument {
    /// Total number of detection items across all categories.
    pub fn item_count(&self) -> usize {
        self.equipment.len()
            + self.instrumentation.len()
            + self.lines.len()
            + self.valves.len()
            + self.junctions.len()
            + self.control_relationships.len()
            + self.annotations.len()
            + self.safety_devices.len()
            + self.unrecognized_symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}
