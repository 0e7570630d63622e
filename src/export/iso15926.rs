//! Lean ISO 15926 projection.
//!
//! A minimal data-exchange view of the document: equipment as physical
//! objects with a class, lines as pipeline segments, instruments and
//! valves linked through `connected_to` / `on_line`. Keys are emitted
//! even when null so consumers get a stable shape.

use serde::Serialize;

use crate::models::{ItemBase, PidDocument};

pub const ISO15926_CONTEXT: &str = "ISO 15926 (lean profile)";

#[derive(Debug, Serialize)]
pub struct Iso15926Export {
    pub context: &'static str,
    pub equipment: Vec<Iso15926Equipment>,
    pub pipeline_segments: Vec<Iso15926Segment>,
    pub instruments: Vec<Iso15926Instrument>,
    pub valves: Vec<Iso15926Valve>,
}

#[derive(Debug, Serialize)]
pub struct Iso15926Equipment {
    pub id: Option<String>,
    pub class: String,
    pub description: Option<String>,
    pub service: Option<String>,
    pub spec: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Iso15926Segment {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub segment_type: Option<String>,
    pub size: Option<String>,
    pub spec: Option<String>,
    pub service: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Iso15926Instrument {
    pub id: Option<String>,
    pub variable: Option<String>,
    #[serde(rename = "loop")]
    pub loop_id: Option<String>,
    pub connected_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Iso15926Valve {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub valve_type: Option<String>,
    pub on_line: Option<String>,
    pub fail_position: Option<String>,
}

/// Free-form fields like `service` and `spec` ride in the catch-all map.
fn extra_str(base: &ItemBase, key: &str) -> Option<String> {
    base.extra
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

pub fn to_iso15926(document: &PidDocument) -> Iso15926Export {
    let equipment = document
        .equipment
        .iter()
        .map(|e| Iso15926Equipment {
            id: e.tag.clone(),
            class: e
                .iso15926_class
                .clone()
                .unwrap_or_else(|| "Equipment".to_string()),
            description: e.description.clone(),
            service: extra_str(&e.base, "service"),
            spec: extra_str(&e.base, "spec"),
        })
        .collect();

    let pipeline_segments = document
        .lines
        .iter()
        .map(|l| Iso15926Segment {
            id: l.line_number_tag.clone(),
            segment_type: l.line_type.clone(),
            size: extra_str(&l.base, "nominal_size"),
            spec: extra_str(&l.base, "spec"),
            service: extra_str(&l.base, "service"),
            from: l.source_tag.clone(),
            to: l.destination_tag.clone(),
        })
        .collect();

    let instruments = document
        .instrumentation
        .iter()
        .map(|i| Iso15926Instrument {
            id: i.tag.clone(),
            variable: i.measured_variable.clone(),
            loop_id: i.loop_id.clone(),
            connected_to: i.connected_to_tag.clone(),
        })
        .collect();

    let valves = document
        .valves
        .iter()
        .map(|v| Iso15926Valve {
            id: v.tag.clone(),
            valve_type: v.valve_type.clone(),
            on_line: v.installed_on_line_tag.clone(),
            fail_position: v.fail_position.clone(),
        })
        .collect();

    Iso15926Export {
        context: ISO15926_CONTEXT,
        equipment,
        pipeline_segments,
        instruments,
        valves,
    }
}
