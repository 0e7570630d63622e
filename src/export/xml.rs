//! Structured XML rendering of a document.
//!
//! The output mirrors the JSON shape: a `Metadata` block, then one
//! `<{Category}List>` of `<{Category}>` elements per non-empty category.
//! Bounding boxes become attribute-carrying `<BoundingBox/>` elements;
//! every other field becomes a PascalCase child element. Items are
//! rendered through their JSON form so catch-all fields come along.

use std::fmt::Write as _;

use serde_json::Value;

use crate::models::PidDocument;

use super::ExportError;

const INDENT: &str = "  ";

/// Categories in document order. Rendering walks this list rather than a
/// JSON map so the element order is stable.
const CATEGORIES: [&str; 9] = [
    "equipment",
    "instrumentation",
    "lines",
    "valves",
    "junctions",
    "control_relationships",
    "annotations",
    "safety_devices",
    "unrecognized_symbols",
];

/// Render the whole document as a pretty-printed XML string.
pub fn document_to_xml(document: &PidDocument) -> Result<String, ExportError> {
    let value = serde_json::to_value(document)?;

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<PIDModel standard=\"ISA-5.1\">\n");

    if let Some(metadata) = value.get("metadata").and_then(Value::as_object) {
        if !metadata.is_empty() {
            let _ = writeln!(out, "{INDENT}<Metadata>");
            for (key, field) in metadata {
                write_field(&mut out, 2, key, field);
            }
            let _ = writeln!(out, "{INDENT}</Metadata>");
        }
    }

    for category in CATEGORIES {
        let Some(items) = value.get(category).and_then(Value::as_array) else {
            continue;
        };
        if items.is_empty() {
            continue;
        }

        let element = capitalize(category);
        let _ = writeln!(out, "{INDENT}<{element}List>");
        for item in items {
            let _ = writeln!(out, "{}<{element}>", INDENT.repeat(2));
            if let Some(fields) = item.as_object() {
                for (key, field) in fields {
                    write_field(&mut out, 3, key, field);
                }
            }
            let _ = writeln!(out, "{}</{element}>", INDENT.repeat(2));
        }
        let _ = writeln!(out, "{INDENT}</{element}List>");
    }

    out.push_str("</PIDModel>\n");
    Ok(out)
}

fn write_field(out: &mut String, depth: usize, key: &str, value: &Value) {
    let pad = INDENT.repeat(depth);

    if key == "bounding_box" {
        if let Some(bbox) = value.as_array() {
            if bbox.len() == 4 {
                let _ = writeln!(
                    out,
                    "{pad}<BoundingBox x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"/>",
                    text_of(&bbox[0]),
                    text_of(&bbox[1]),
                    text_of(&bbox[2]),
                    text_of(&bbox[3]),
                );
                return;
            }
        }
    }

    let element = pascal_case(key);
    let _ = writeln!(out, "{pad}<{element}>{}</{element}>", escape(&text_of(value)));
}

/// Plain text form of a leaf value. Compound values keep their JSON
/// rendering, which is good enough for free-form catch-all fields.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `line_number_tag` -> `LineNumberTag`.
fn pascal_case(key: &str) -> String {
    key.split('_').map(title_word).collect()
}

/// Uppercase only the first character, keep the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn title_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        }
        None => String::new(),
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Equipment, Line};

    fn sample_document() -> PidDocument {
        let mut doc = PidDocument::default();
        doc.metadata.drawing_number = Some("PID-001".into());
        doc.equipment.push(Equipment {
            tag: Some("P-101".into()),
            equipment_type: Some("Pump".into()),
            description: Some("Feed & transfer".into()),
            base: crate::models::ItemBase {
                bounding_box: Some(vec![10, 20, 30, 40]),
                ..Default::default()
            },
            ..Default::default()
        });
        doc
    }

    #[test]
    fn renders_model_root_with_standard() {
        let xml = document_to_xml(&sample_document()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<PIDModel standard=\"ISA-5.1\">"));
        assert!(xml.trim_end().ends_with("</PIDModel>"));
    }

    #[test]
    fn bounding_box_becomes_attributes() {
        let xml = document_to_xml(&sample_document()).unwrap();
        assert!(xml.contains("<BoundingBox x1=\"10\" y1=\"20\" x2=\"30\" y2=\"40\"/>"));
    }

    #[test]
    fn field_names_pascal_cased_and_text_escaped() {
        let xml = document_to_xml(&sample_document()).unwrap();
        assert!(xml.contains("<DrawingNumber>PID-001</DrawingNumber>"));
        assert!(xml.contains("<Description>Feed &amp; transfer</Description>"));
        assert!(xml.contains("<EquipmentList>"));
        assert!(xml.contains("<Equipment>"));
    }

    #[test]
    fn empty_categories_omitted() {
        let xml = document_to_xml(&sample_document()).unwrap();
        assert!(!xml.contains("<ValvesList>"));
        assert!(!xml.contains("<JunctionsList>"));
    }

    #[test]
    fn line_fields_survive_rendering() {
        let mut doc = PidDocument::default();
        doc.lines.push(Line {
            line_number_tag: Some("L-001".into()),
            line_type: Some("process".into()),
            ..Default::default()
        });
        let xml = document_to_xml(&doc).unwrap();
        assert!(xml.contains("<LinesList>"));
        assert!(xml.contains("<LineNumberTag>L-001</LineNumberTag>"));
        assert!(xml.contains("<LineType>process</LineType>"));
    }
}
