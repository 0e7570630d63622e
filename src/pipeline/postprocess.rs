//! Postprocessing: canonicalize identifiers for cross-referencing and make
//! sure every item can be addressed (synthetic tags, labels, category
//! names). Idempotent: re-running on an already postprocessed document
//! changes nothing, because synthesis only fires on blank values and the
//! case mappings are fixed points.

use crate::ids::IdSource;
use crate::models::{ItemBase, PidDocument};
use crate::standards::LINE_TYPE_UNKNOWN;

/// Canonicalize the whole document in place.
pub fn postprocess_document(doc: &mut PidDocument, ids: &mut IdSource) {
    for line in &mut doc.lines {
        line.line_number_tag = Some(match non_blank(line.line_number_tag.as_deref()) {
            Some(tag) => tag.to_uppercase(),
            None => format!("UNSPECIFIED-LINE-{}", ids.hex4()),
        });
        line.source_tag = Some(uppercase_or_unknown(line.source_tag.as_deref()));
        line.destination_tag = Some(uppercase_or_unknown(line.destination_tag.as_deref()));
        line.line_type = Some(
            non_blank(line.line_type.as_deref())
                .map(|t| t.to_lowercase())
                .unwrap_or_else(|| LINE_TYPE_UNKNOWN.to_string()),
        );
        let label_source = line.line_number_tag.clone();
        ensure_identity(&mut line.base, "lines", label_source.as_deref());
    }

    for inst in &mut doc.instrumentation {
        inst.tag = Some(match non_blank(inst.tag.as_deref()) {
            Some(tag) => tag.to_uppercase(),
            None => synthesize_instrument_tag(
                inst.measured_variable.as_deref(),
                inst.instrument_type.as_deref(),
                inst.loop_id.as_deref(),
                ids,
            ),
        });
        let label_source = inst.tag.clone();
        ensure_identity(&mut inst.base, "instrumentation", label_source.as_deref());
    }

    for equipment in &mut doc.equipment {
        equipment.tag = Some(match non_blank(equipment.tag.as_deref()) {
            Some(tag) => tag.to_uppercase(),
            None => format!("EQUIP-{}", ids.hex4()),
        });
        let label_source = equipment.tag.clone();
        ensure_identity(&mut equipment.base, "equipment", label_source.as_deref());
    }

    for valve in &mut doc.valves {
        valve.tag = Some(match non_blank(valve.tag.as_deref()) {
            Some(tag) => tag.to_uppercase(),
            None => format!("VALVE-{}", ids.hex4()),
        });
        let label_source = valve.tag.clone();
        ensure_identity(&mut valve.base, "valves", label_source.as_deref());
    }

    for junction in &mut doc.junctions {
        let label_source = junction.junction_id.clone();
        ensure_identity(&mut junction.base, "junctions", label_source.as_deref());
    }
    for rel in &mut doc.control_relationships {
        let label_source = match (rel.source_tag.as_deref(), rel.destination_tag.as_deref()) {
            (Some(s), Some(d)) => Some(format!("{s} -> {d}")),
            _ => None,
        };
        ensure_identity(&mut rel.base, "control_relationships", label_source.as_deref());
    }
    for annotation in &mut doc.annotations {
        let label_source = annotation.text.clone();
        ensure_identity(&mut annotation.base, "annotations", label_source.as_deref());
    }
    for device in &mut doc.safety_devices {
        let label_source = device.tag.clone().or_else(|| device.device_type.clone());
        ensure_identity(&mut device.base, "safety_devices", label_source.as_deref());
    }
    for symbol in &mut doc.unrecognized_symbols {
        let label_source = symbol.description.clone();
        ensure_identity(&mut symbol.base, "unrecognized_symbols", label_source.as_deref());
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn uppercase_or_unknown(value: Option<&str>) -> String {
    non_blank(value)
        .map(|s| s.to_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

/// Build an ISA-style tag for an untagged instrument:
/// measured-variable initial (default 'X'), function initial from the
/// instrument type (default 'I'), then the loop number or a pseudo-random
/// three-digit fallback.
fn synthesize_instrument_tag(
    measured_variable: Option<&str>,
    instrument_type: Option<&str>,
    loop_id: Option<&str>,
    ids: &mut IdSource,
) -> String {
    let variable = first_letter(measured_variable).unwrap_or('X');
    let function = first_letter(instrument_type).unwrap_or('I');
    let loop_number = match non_blank(loop_id) {
        Some(loop_id) => loop_id.to_string(),
        None => ids.loop_number(),
    };
    format!("{variable}{function}-{loop_number}")
}

fn first_letter(value: Option<&str>) -> Option<char> {
    non_blank(value)?.chars().next().map(|c| c.to_ascii_uppercase())
}

/// Guarantee `category_name` and a non-empty `label` on an item, without
/// touching values the model already provided.
fn ensure_identity(base: &mut ItemBase, category: &str, label_source: Option<&str>) {
    if non_blank(base.category_name.as_deref()).is_none() {
        base.category_name = Some(category.to_string());
    }
    if non_blank(base.label.as_deref()).is_none() {
        base.label = Some(
            non_blank(label_source)
                .map(|s| s.to_string())
                .unwrap_or_else(|| category.to_string()),
        );
    }
}
