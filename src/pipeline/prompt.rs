//! The master extraction prompt sent with every drawing.

/// System role for the vision call.
pub const SYSTEM_PROMPT: &str = "You are an expert AI process engineer. You read Piping & Instrumentation \
Diagrams and report their content as structured data following ISA-5.1 and \
ISO 14617 conventions.";

/// Category-by-category extraction instructions.
///
/// The coordinate, labeling and category rules here are load-bearing: the
/// normalizer and validator assume the 0–1000 frame, the `[x1,y1,x2,y2]`
/// box order and the category key names given below.
pub const MASTER_PROMPT: &str = r#"Your SOLE task is to output ONE valid JSON object for the provided P&ID image.
Output NOTHING except the JSON (must start with { and end with }).

================= JSON RULES =================
- Return ONLY a JSON object (no Markdown, no commentary).
- All arrays must contain only objects (no trailing commas).
- Use null for missing values, never empty strings.

================= COORDINATE SYSTEM =================
- All bounding boxes MUST be normalized to the image frame where (0,0) is
  top-left and (1000,1000) is bottom-right.
- bounding_box format: [x1, y1, x2, y2] with integers only.
- Must satisfy: x1 < x2, y1 < y2.
- Boxes must be TIGHT around the actual symbol/text.

================= LABELING RULES =================
Every object MUST have a non-empty "label".
Priority for label: tag, line_number_tag, junction_id, text, type,
category_name. Never output "Unknown", "N/A", or an empty label.

================= CATEGORIES =================
The top-level JSON object may include any subset of these keys (omit if
empty). Every object carries "category_name" and "label".

1) metadata: object
   fields: drawing_title?, drawing_number?, revision?
2) equipment: array
   fields: tag?, type?, description?, bounding_box
3) instrumentation: array
   fields: tag?, type?, measured_variable?, loop_id?, connected_to_tag?,
   bounding_box
4) lines: array
   fields: line_number_tag?, source_tag?, destination_tag?,
   line_type? (one of ["process", "instrument_signal", "electrical_signal",
   "utility", "pneumatic", "hydraulic", "unknown"]), style_hint?,
   bounding_box?
5) valves: array
   fields: tag?, type?, installed_on_line_tag?, fail_position?, bounding_box
6) junctions: array
   fields: junction_id?, connected_lines?, off_page?, page_ref?, bounding_box
7) control_relationships: array
   fields: source_tag, destination_tag,
   relationship_type ("measures", "controls", "signals")
8) annotations: array
   fields: text, associated_tag?, bounding_box
9) safety_devices: array
   fields: tag?, type?, location?, installed_on_tag?, bounding_box
10) unrecognized_symbols: array
    fields: description, bounding_box, flag_for_review=true, review_reason?

================= VALIDATION RULES =================
- If any field is uncertain, include "flag_for_review": true and a
  "review_reason".
- DO NOT hallucinate connections; only include what is clearly visible.
"#;
