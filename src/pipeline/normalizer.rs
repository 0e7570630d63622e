//! Normalization: enrich each raw item with fields derived from the tag
//! grammars and the standards profile, then attach data-quality flags.
//!
//! Two rules hold everywhere:
//! * an AI-provided, non-empty value is never overwritten (only the fixed
//!   `standard_reference` constants and the metadata standards list are
//!   stamped unconditionally);
//! * normalization is total: malformed values produce flags, never errors.

use crate::models::{Equipment, Instrument, ItemBase, Line, PidDocument, Valve};
use crate::standards::{
    StandardsProfile, EQUIPMENT_STANDARD, INSTRUMENT_STANDARD, LINE_STANDARD, LINE_TYPE_UNKNOWN,
    STANDARDS_REFERENCED,
};
use crate::tags::strict_parse_tag;

/// Tag values the model uses as "I don't know".
const FORBIDDEN_TAG_VALUES: &[&str] = &["", "Unknown", "UNK"];

/// Normalize a whole document. The input is cloned; the caller's copy is
/// never aliased or mutated.
pub fn normalize_document(input: &PidDocument, profile: &StandardsProfile) -> PidDocument {
    let mut doc = input.clone();

    for item in &mut doc.equipment {
        normalize_equipment(item, profile);
        attach_flags(&mut item.base, Some(&item.tag));
    }
    for item in &mut doc.valves {
        normalize_valve(item, profile);
        attach_flags(&mut item.base, Some(&item.tag));
    }
    for item in &mut doc.instrumentation {
        normalize_instrument(item, profile);
        attach_flags(&mut item.base, Some(&item.tag));
    }
    for item in &mut doc.lines {
        normalize_line(item, profile);
        attach_flags(&mut item.base, None);
    }

    // Pass-through categories: flag attachment only.
    for item in &mut doc.junctions {
        attach_flags(&mut item.base, None);
    }
    for item in &mut doc.control_relationships {
        attach_flags(&mut item.base, None);
    }
    for item in &mut doc.annotations {
        attach_flags(&mut item.base, None);
    }
    for item in &mut doc.safety_devices {
        attach_flags(&mut item.base, Some(&item.tag));
    }
    for item in &mut doc.unrecognized_symbols {
        attach_flags(&mut item.base, None);
    }

    // Stamped unconditionally, whatever the model claimed.
    doc.metadata.standards_referenced =
        STANDARDS_REFERENCED.iter().map(|s| s.to_string()).collect();

    doc
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// Derive loop ID, measured variable and ISA function from a strict tag
/// match; stamp the ISA-5.1 reference.
fn normalize_instrument(inst: &mut Instrument, profile: &StandardsProfile) {
    let parsed = inst.tag.as_deref().and_then(strict_parse_tag);

    if let Some(parts) = &parsed {
        if is_blank(&inst.loop_id) {
            inst.loop_id = Some(parts.loop_id.clone());
        }
        if is_blank(&inst.measured_variable) {
            inst.measured_variable = profile
                .measured_variable(&parts.prefix)
                .map(|v| v.to_string());
        }
    }

    if is_blank(&inst.isa_function) {
        let letters = parsed.as_ref().map(|p| p.prefix.as_str()).unwrap_or("");
        inst.isa_function = if letters.contains("IC") {
            Some("Indicating Controller".to_string())
        } else if letters.ends_with('I') {
            Some("Indicator".to_string())
        } else if letters.ends_with('T') {
            Some("Transmitter".to_string())
        } else {
            None
        };
    }

    inst.standard_reference = Some(INSTRUMENT_STANDARD.to_string());
}

fn normalize_valve(valve: &mut Valve, profile: &StandardsProfile) {
    let valve_type = valve.valve_type.as_deref().unwrap_or("");
    valve.standard_reference = Some(profile.valve_standard(valve_type).to_string());
}

fn normalize_equipment(equipment: &mut Equipment, profile: &StandardsProfile) {
    equipment.standard_reference = Some(EQUIPMENT_STANDARD.to_string());
    if is_blank(&equipment.iso15926_class) {
        let equipment_type = equipment.equipment_type.as_deref().unwrap_or("");
        equipment.iso15926_class = Some(profile.equipment_class(equipment_type).to_string());
    }
}

fn normalize_line(line: &mut Line, profile: &StandardsProfile) {
    line.standard_reference = Some(LINE_STANDARD.to_string());
    if is_blank(&line.line_type) {
        let inferred = line
            .style_hint
            .as_deref()
            .and_then(|hint| profile.line_type_for_style(hint));
        line.line_type = Some(inferred.unwrap_or(LINE_TYPE_UNKNOWN).to_string());
    }
}

/// Attach data-quality flags to one item.
///
/// `tag` is `Some` for categories that carry a tag field; pass-through
/// categories without one (lines, junctions, annotations, control
/// relationships, unrecognized symbols) get no tag check. Flags accumulate
/// in a sorted set, so re-running is a no-op.
pub fn attach_flags(base: &mut ItemBase, tag: Option<&Option<String>>) {
    match &base.bounding_box {
        None => {
            base.flags.insert("missing_bbox".to_string());
        }
        Some(bbox) if bbox.len() != 4 => {
            base.flags.insert("invalid_bbox".to_string());
        }
        Some(bbox) => {
            let (x1, y1, x2, y2) = (bbox[0], bbox[1], bbox[2], bbox[3]);
            if x2 <= x1 || y2 <= y1 {
                base.flags.insert("bbox_not_tight".to_string());
            }
        }
    }

    if let Some(tag) = tag {
        let missing = match tag.as_deref() {
            None => true,
            Some(value) => FORBIDDEN_TAG_VALUES.contains(&value),
        };
        if missing {
            base.flags.insert("missing_tag".to_string());
        }
    }
}
