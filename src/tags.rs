//! ISA-5.1 tag grammars.
//!
//! Two grammars with deliberately different strictness:
//!
//! * The **loose** grammar (`parse_instrument_tag`, `parse_equipment_tag`)
//!   accepts anything that starts like a standard tag. The review engine
//!   uses it to flag non-standard formats.
//! * The **strict** grammar (`strict_parse_tag`) anchors the whole string
//!   and bounds the loop digits. The normalizer derives measured variables
//!   and loop IDs only from strict matches.
//!
//! All parsers are total: malformed input yields `None`, never a panic.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::Instrument;

static INSTRUMENT_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{1,4})[-\s]?(\d+)([A-Z]?)").unwrap());

static EQUIPMENT_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z])-?(\d+)([A-Z]?/?B?)").unwrap());

static STRICT_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{1,4})[-\s]?(\d{2,5})([A-Z]?)$").unwrap());

/// Components of a loosely parsed instrument tag, e.g. `TIC-203A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentTagParts {
    pub function: String,
    pub loop_id: String,
    pub suffix: String,
}

/// Components of a loosely parsed equipment tag, e.g. `P-101A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentTagParts {
    pub class: String,
    pub area_or_unit: String,
    pub suffix: String,
}

/// Components of a strictly parsed ISA tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrictTagParts {
    pub prefix: String,
    pub loop_id: String,
    pub suffix: String,
}

/// Loose parse of an ISA instrument tag ("FT-101", "TIC203A").
pub fn parse_instrument_tag(tag: &str) -> Option<InstrumentTagParts> {
    let caps = INSTRUMENT_TAG_RE.captures(tag.trim())?;
    Some(InstrumentTagParts {
        function: caps[1].to_string(),
        loop_id: caps[2].to_string(),
        suffix: caps[3].to_string(),
    })
}

/// Loose parse of an equipment tag ("P-101", "V-10A").
pub fn parse_equipment_tag(tag: &str) -> Option<EquipmentTagParts> {
    let caps = EQUIPMENT_TAG_RE.captures(tag.trim())?;
    Some(EquipmentTagParts {
        class: caps[1].to_string(),
        area_or_unit: caps[2].to_string(),
        suffix: caps[3].to_string(),
    })
}

/// Strict, fully anchored parse. Rejects trailing content and loop
/// numbers outside 2–5 digits.
pub fn strict_parse_tag(tag: &str) -> Option<StrictTagParts> {
    let caps = STRICT_TAG_RE.captures(tag.trim())?;
    Some(StrictTagParts {
        prefix: caps[1].to_string(),
        loop_id: caps[2].to_string(),
        suffix: caps[3].to_string(),
    })
}

/// Group instrument tags by the loop ID the loose grammar extracts.
///
/// The grouping is the raw material for a control-loop completeness audit
/// (every loop should hold a sensor, a controller and a final element);
/// only the grouping itself happens here.
pub fn group_by_loop(instruments: &[Instrument]) -> BTreeMap<String, Vec<String>> {
    let mut loops: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for instrument in instruments {
        let Some(tag) = instrument.tag.as_deref() else {
            continue;
        };
        if let Some(parts) = parse_instrument_tag(tag) {
            if !parts.loop_id.is_empty() {
                loops.entry(parts.loop_id).or_default().push(tag.to_string());
            }
        }
    }
    loops
}
