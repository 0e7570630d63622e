//! Detection item records, one discriminated type per drawing category.
//!
//! Every item embeds a flattened [`ItemBase`] carrying the fields the
//! vision model attaches to all detections (label, bounding box,
//! confidence, review markers, data-quality flags) plus a catch-all map
//! that preserves any field the model emitted that we do not model
//! explicitly (nominal sizes, service descriptions, polylines, ...).

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Fields shared by every detection item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemBase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// `[x1, y1, x2, y2]` in the 0–1000 normalized image frame.
    ///
    /// Deserialized tolerantly: a non-array value becomes an empty vec so
    /// that shape violations surface as `invalid_bbox` flags instead of
    /// dropping the whole item.
    #[serde(
        default,
        deserialize_with = "deserialize_bbox",
        skip_serializing_if = "Option::is_none"
    )]
    pub bounding_box: Option<Vec<i64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_for_review: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_reason: Option<String>,

    /// Data-quality flags attached during normalization. A sorted set, so
    /// repeated flag attachment is idempotent and order-stable.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub flags: BTreeSet<String>,

    /// AI-provided fields we pass through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Tolerant bounding-box deserializer.
///
/// Numeric array elements are rounded to integers; anything else present
/// under the key degrades to a shape the flag checks can reject.
fn deserialize_bbox<'de, D>(deserializer: D) -> Result<Option<Vec<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Array(elements)) => Some(
            elements
                .iter()
                .filter_map(|v| v.as_f64().map(|f| f.round() as i64))
                .collect(),
        ),
        Some(_) => Some(Vec::new()),
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Equipment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub equipment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso15926_class: Option<String>,
    #[serde(flatten)]
    pub base: ItemBase,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Instrument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub instrument_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isa_function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_to_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_reference: Option<String>,
    #[serde(flatten)]
    pub base: ItemBase,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Line {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_reference: Option<String>,
    #[serde(flatten)]
    pub base: ItemBase,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Valve {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub valve_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_on_line_tag: Option<String>,
    /// FO / FC / FL / Unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_reference: Option<String>,
    #[serde(flatten)]
    pub base: ItemBase,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Junction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connected_lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_page: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_ref: Option<String>,
    #[serde(flatten)]
    pub base: ItemBase,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ControlRelationship {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_tag: Option<String>,
    /// measures / controls / drives / signals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_id: Option<String>,
    #[serde(flatten)]
    pub base: ItemBase,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub base: ItemBase,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SafetyDevice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_on_tag: Option<String>,
    #[serde(flatten)]
    pub base: ItemBase,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UnrecognizedSymbol {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub base: ItemBase,
}
