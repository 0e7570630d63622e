//! Schema validation, the one stage allowed to halt the pipeline.
//!
//! Runs after normalize + postprocess, so identity invariants (tags,
//! labels) are enforceable here. Data-quality issues (a missing bounding
//! box, a low confidence) are deliberately NOT violations; they ride
//! along as flags for review. What is checked: identity fields the rest
//! of the tooling keys on (tags, and the type classifiers the standards
//! lookups run against), enumeration membership, and the shape of any
//! bounding box that is present.

use thiserror::Error;

use crate::models::PidDocument;
use crate::standards::LINE_TYPES;

/// First failing constraint, with a path into the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path}: {constraint}")]
pub struct SchemaViolation {
    pub path: String,
    pub constraint: String,
}

const FAIL_POSITIONS: &[&str] = &["FO", "FC", "FL", "Unknown"];
const RELATIONSHIP_TYPES: &[&str] = &["measures", "controls", "drives", "signals"];
const VALVE_STANDARDS: &[&str] = &["ISA-5.1", "ISO 10628", "ISO 14617"];
const SAFETY_STANDARDS: &[&str] = &["ISO 14617", "ISA-5.1"];

/// Validate a normalized, postprocessed document. Returns the first
/// failing constraint.
pub fn validate_document(doc: &PidDocument) -> Result<(), SchemaViolation> {
    for (i, item) in doc.equipment.iter().enumerate() {
        let path = format!("equipment[{i}]");
        require_tag(&path, item.tag.as_deref())?;
        require_type(&path, item.equipment_type.as_deref())?;
        check_bbox_shape(&path, item.base.bounding_box.as_deref())?;
        check_enum(
            &path,
            "standard_reference",
            item.standard_reference.as_deref(),
            &["ISO 15926"],
        )?;
    }

    for (i, item) in doc.instrumentation.iter().enumerate() {
        let path = format!("instrumentation[{i}]");
        require_tag(&path, item.tag.as_deref())?;
        require_type(&path, item.instrument_type.as_deref())?;
        check_bbox_shape(&path, item.base.bounding_box.as_deref())?;
        check_enum(
            &path,
            "standard_reference",
            item.standard_reference.as_deref(),
            &["ISA-5.1"],
        )?;
    }

    for (i, item) in doc.lines.iter().enumerate() {
        let path = format!("lines[{i}]");
        match item.line_type.as_deref() {
            None => {
                return Err(violation(&path, "line_type is required"));
            }
            Some(line_type) if !LINE_TYPES.contains(&line_type) => {
                return Err(violation(
                    &path,
                    &format!("line_type '{line_type}' is not in the allowed set"),
                ));
            }
            Some(_) => {}
        }
        check_bbox_shape(&path, item.base.bounding_box.as_deref())?;
        check_enum(
            &path,
            "standard_reference",
            item.standard_reference.as_deref(),
            &["ISO 10628"],
        )?;
    }

    for (i, item) in doc.valves.iter().enumerate() {
        let path = format!("valves[{i}]");
        require_tag(&path, item.tag.as_deref())?;
        require_type(&path, item.valve_type.as_deref())?;
        check_bbox_shape(&path, item.base.bounding_box.as_deref())?;
        check_enum(&path, "fail_position", item.fail_position.as_deref(), FAIL_POSITIONS)?;
        check_enum(
            &path,
            "standard_reference",
            item.standard_reference.as_deref(),
            VALVE_STANDARDS,
        )?;
    }

    for (i, item) in doc.junctions.iter().enumerate() {
        check_bbox_shape(&format!("junctions[{i}]"), item.base.bounding_box.as_deref())?;
    }

    for (i, item) in doc.control_relationships.iter().enumerate() {
        let path = format!("control_relationships[{i}]");
        if item.source_tag.as_deref().map_or(true, str::is_empty) {
            return Err(violation(&path, "source_tag is required"));
        }
        if item.destination_tag.as_deref().map_or(true, str::is_empty) {
            return Err(violation(&path, "destination_tag is required"));
        }
        match item.relationship_type.as_deref() {
            None => return Err(violation(&path, "relationship_type is required")),
            Some(rel) if !RELATIONSHIP_TYPES.contains(&rel) => {
                return Err(violation(
                    &path,
                    &format!("relationship_type '{rel}' is not in the allowed set"),
                ));
            }
            Some(_) => {}
        }
    }

    for (i, item) in doc.annotations.iter().enumerate() {
        let path = format!("annotations[{i}]");
        if item.text.as_deref().map_or(true, str::is_empty) {
            return Err(violation(&path, "text is required"));
        }
        check_bbox_shape(&path, item.base.bounding_box.as_deref())?;
    }

    for (i, item) in doc.safety_devices.iter().enumerate() {
        let path = format!("safety_devices[{i}]");
        require_type(&path, item.device_type.as_deref())?;
        check_bbox_shape(&path, item.base.bounding_box.as_deref())?;
        check_enum(
            &path,
            "standard_reference",
            item.base
                .extra
                .get("standard_reference")
                .and_then(|v| v.as_str()),
            SAFETY_STANDARDS,
        )?;
    }

    for (i, item) in doc.unrecognized_symbols.iter().enumerate() {
        let path = format!("unrecognized_symbols[{i}]");
        if item.description.as_deref().map_or(true, str::is_empty) {
            return Err(violation(&path, "description is required"));
        }
        if item.base.flag_for_review != Some(true) {
            return Err(violation(&path, "flag_for_review must be true"));
        }
    }

    Ok(())
}

fn violation(path: &str, constraint: &str) -> SchemaViolation {
    SchemaViolation {
        path: path.to_string(),
        constraint: constraint.to_string(),
    }
}

fn require_tag(path: &str, tag: Option<&str>) -> Result<(), SchemaViolation> {
    if tag.map_or(true, |t| t.trim().is_empty()) {
        return Err(violation(path, "tag is required and must be non-empty"));
    }
    Ok(())
}

fn require_type(path: &str, item_type: Option<&str>) -> Result<(), SchemaViolation> {
    if item_type.map_or(true, |t| t.trim().is_empty()) {
        return Err(violation(path, "type is required and must be non-empty"));
    }
    Ok(())
}

/// A bounding box, when present, must hold exactly four coordinates.
fn check_bbox_shape(path: &str, bbox: Option<&[i64]>) -> Result<(), SchemaViolation> {
    if let Some(bbox) = bbox {
        if bbox.len() != 4 {
            return Err(violation(
                path,
                &format!("bounding_box must have 4 coordinates, got {}", bbox.len()),
            ));
        }
    }
    Ok(())
}

fn check_enum(
    path: &str,
    field: &str,
    value: Option<&str>,
    allowed: &[&str],
) -> Result<(), SchemaViolation> {
    if let Some(value) = value {
        if !allowed.contains(&value) {
            return Err(violation(
                path,
                &format!("{field} '{value}' is not in the allowed set"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdSource;
    use crate::pipeline::{normalize_document, postprocess_document};
    use crate::standards::StandardsProfile;
    use serde_json::json;

    fn doc_from(value: serde_json::Value) -> PidDocument {
        serde_json::from_value(value).unwrap()
    }

    fn pipeline(value: serde_json::Value) -> PidDocument {
        let mut doc = normalize_document(&doc_from(value), &StandardsProfile::default());
        postprocess_document(&mut doc, &mut IdSource::with_seed(5));
        doc
    }

    #[test]
    fn empty_document_is_valid() {
        assert!(validate_document(&PidDocument::default()).is_ok());
    }

    #[test]
    fn normalized_document_passes() {
        let doc = pipeline(json!({
            "equipment": [{ "tag": "P-101", "type": "Pump", "bounding_box": [1, 2, 30, 40] }],
            "instrumentation": [{
                "tag": "FT-101", "type": "Flow Transmitter",
                "bounding_box": [5, 5, 25, 25]
            }],
            "lines": [{ "source_tag": "P-101", "destination_tag": "FT-101" }],
            "valves": [{ "type": "Gate Valve", "fail_position": "FC" }],
            "control_relationships": [{
                "source_tag": "FT-101", "destination_tag": "FIC-101",
                "relationship_type": "measures"
            }],
            "unrecognized_symbols": [{
                "description": "hexagon with dot", "flag_for_review": true
            }]
        }));
        assert!(validate_document(&doc).is_ok());
    }

    #[test]
    fn missing_equipment_tag_is_first_violation() {
        let doc = doc_from(json!({ "equipment": [{ "type": "Pump" }] }));
        let err = validate_document(&doc).unwrap_err();
        assert_eq!(err.path, "equipment[0]");
        assert!(err.constraint.contains("tag"));
    }

    #[test]
    fn bad_line_type_rejected_with_path() {
        let doc = doc_from(json!({ "lines": [
            { "line_type": "process" },
            { "line_type": "telepathic" }
        ] }));
        let err = validate_document(&doc).unwrap_err();
        assert_eq!(err.path, "lines[1]");
        assert!(err.constraint.contains("telepathic"));
    }

    #[test]
    fn wrong_bbox_shape_rejected() {
        let doc = doc_from(json!({ "junctions": [
            { "junction_id": "J-1", "bounding_box": [1, 2, 3] }
        ] }));
        let err = validate_document(&doc).unwrap_err();
        assert_eq!(err.path, "junctions[0]");
        assert!(err.constraint.contains("4 coordinates"));
    }

    #[test]
    fn bad_fail_position_rejected() {
        let doc = doc_from(json!({ "valves": [
            { "tag": "XV-1", "type": "Control Valve", "fail_position": "wide open" }
        ] }));
        let err = validate_document(&doc).unwrap_err();
        assert!(err.constraint.contains("fail_position"));
    }

    #[test]
    fn typeless_equipment_rejected() {
        // The type classifier feeds the standards lookups; postprocess
        // synthesizes tags but never types, so validation must catch this.
        let doc = pipeline(json!({ "equipment": [
            { "tag": "P-101", "bounding_box": [1, 2, 30, 40] }
        ] }));
        let err = validate_document(&doc).unwrap_err();
        assert_eq!(err.path, "equipment[0]");
        assert!(err.constraint.contains("type"));
    }

    #[test]
    fn typeless_instrument_valve_and_safety_device_rejected() {
        for value in [
            json!({ "instrumentation": [{ "tag": "FT-101" }] }),
            json!({ "valves": [{ "tag": "XV-1" }] }),
            json!({ "safety_devices": [{ "tag": "PSV-100" }] }),
        ] {
            let doc = pipeline(value);
            let err = validate_document(&doc).unwrap_err();
            assert!(err.constraint.contains("type"), "got: {err}");
        }
    }

    #[test]
    fn bad_relationship_type_rejected() {
        let doc = doc_from(json!({ "control_relationships": [{
            "source_tag": "A", "destination_tag": "B", "relationship_type": "admires"
        }] }));
        let err = validate_document(&doc).unwrap_err();
        assert!(err.constraint.contains("admires"));
    }

    #[test]
    fn unflagged_unrecognized_symbol_rejected() {
        let doc = doc_from(json!({ "unrecognized_symbols": [
            { "description": "odd circle" }
        ] }));
        let err = validate_document(&doc).unwrap_err();
        assert!(err.constraint.contains("flag_for_review"));
    }

    #[test]
    fn violation_displays_path_and_constraint() {
        let err = violation("valves[3]", "tag is required");
        assert_eq!(err.to_string(), "valves[3]: tag is required");
    }
}
