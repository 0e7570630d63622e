//! Standards classification tables.
//!
//! A `StandardsProfile` is the single source of truth for mapping the
//! vocabulary the vision model emits (equipment types, valve types, line
//! style hints, instrument tag prefixes) onto industry-standard
//! classifications. Changing plant convention means editing the profile,
//! not the normalization algorithm, so the profile is passed into the
//! pipeline rather than read from globals.

use std::collections::BTreeMap;

/// The four governing standards stamped into every normalized document.
pub const STANDARDS_REFERENCED: &[&str] =
    &["ISA-5.1", "ISO 10628", "ISO 14617", "ISO 15926"];

/// Fixed standard references per category.
pub const INSTRUMENT_STANDARD: &str = "ISA-5.1";
pub const EQUIPMENT_STANDARD: &str = "ISO 15926";
pub const LINE_STANDARD: &str = "ISO 10628";

/// Canonical sentinel for a line whose type could not be determined.
pub const LINE_TYPE_UNKNOWN: &str = "unknown";

/// Line types the schema accepts.
pub const LINE_TYPES: &[&str] = &[
    "process",
    "instrument_signal",
    "electrical_signal",
    "electrical",
    "pneumatic",
    "hydraulic",
    "utility",
    "vent",
    "unknown",
];

/// Read-only lookup tables for standards classification.
#[derive(Debug, Clone)]
pub struct StandardsProfile {
    /// Instrument tag prefix → measured process variable.
    measured_variables: BTreeMap<&'static str, &'static str>,
    /// Valve type → governing symbol standard.
    valve_standards: BTreeMap<&'static str, &'static str>,
    /// Equipment type → ISO 15926 class.
    equipment_classes: BTreeMap<&'static str, &'static str>,
    /// Line style hint substring → line type.
    line_styles: Vec<(&'static str, &'static str)>,
}

impl Default for StandardsProfile {
    fn default() -> Self {
        Self {
            measured_variables: BTreeMap::from([
                ("F", "Flow"),
                ("T", "Temperature"),
                ("P", "Pressure"),
                ("L", "Level"),
                ("FI", "Flow"),
                ("TI", "Temperature"),
                ("PI", "Pressure"),
                ("LI", "Level"),
                ("FIC", "Flow"),
                ("TIC", "Temperature"),
                ("PIC", "Pressure"),
                ("LIC", "Level"),
            ]),
            valve_standards: BTreeMap::from([
                ("Control Valve", "ISA-5.1"),
                ("Gate Valve", "ISO 14617"),
                ("Globe Valve", "ISO 14617"),
                ("Check Valve", "ISO 14617"),
                ("Relief Valve", "ISO 14617"),
            ]),
            equipment_classes: BTreeMap::from([
                ("Pump", "Pump"),
                ("Centrifugal Pump", "Pump"),
                ("Compressor", "Compressor"),
                ("Heat Exchanger", "Heat Exchanger"),
                ("Reboiler", "Heat Exchanger"),
                ("Vessel", "Vessel"),
                ("Column", "Column"),
                ("Tank", "Tank"),
                ("Filter", "Filter"),
            ]),
            // Ordered: longer hints must win over their substrings
            // ("dot-dash" before "dash", "dotted" before "dot").
            line_styles: vec![
                ("dot-dash", "electrical_signal"),
                ("dotted", "pneumatic"),
                ("dashed", "instrument_signal"),
                ("dash", "instrument_signal"),
                ("solid", "process"),
            ],
        }
    }
}

impl StandardsProfile {
    /// Infer the measured variable from an instrument tag prefix.
    ///
    /// Exact prefix match first (so multi-letter prefixes like "TIC"
    /// resolve directly), then the first letter, else `None`.
    pub fn measured_variable(&self, prefix: &str) -> Option<&'static str> {
        if prefix.is_empty() {
            return None;
        }
        if let Some(v) = self.measured_variables.get(prefix) {
            return Some(v);
        }
        let first = &prefix[..prefix
            .char_indices()
            .nth(1)
            .map(|(i, _)| i)
            .unwrap_or(prefix.len())];
        self.measured_variables.get(first).copied()
    }

    /// Governing standard for a valve type, default "ISA-5.1".
    pub fn valve_standard(&self, valve_type: &str) -> &'static str {
        self.valve_standards
            .get(valve_type)
            .copied()
            .unwrap_or("ISA-5.1")
    }

    /// ISO 15926 class for an equipment type, default "Equipment".
    pub fn equipment_class(&self, equipment_type: &str) -> &'static str {
        self.equipment_classes
            .get(equipment_type)
            .copied()
            .unwrap_or("Equipment")
    }

    /// Infer the line type from a drawing style hint, by substring match.
    pub fn line_type_for_style(&self, style_hint: &str) -> Option<&'static str> {
        let hint = style_hint.to_lowercase();
        self.line_styles
            .iter()
            .find(|(style, _)| hint.contains(style))
            .map(|&(_, line_type)| line_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Measured variable inference ─────────────────────────────────

    #[test]
    fn exact_prefix_wins_over_first_letter() {
        let profile = StandardsProfile::default();
        assert_eq!(profile.measured_variable("TIC"), Some("Temperature"));
        assert_eq!(profile.measured_variable("FIC"), Some("Flow"));
    }

    #[test]
    fn first_letter_fallback() {
        let profile = StandardsProfile::default();
        // "FT" has no exact entry; falls back to "F"
        assert_eq!(profile.measured_variable("FT"), Some("Flow"));
        assert_eq!(profile.measured_variable("PSV"), Some("Pressure"));
    }

    #[test]
    fn unknown_prefix_is_none() {
        let profile = StandardsProfile::default();
        assert_eq!(profile.measured_variable("X"), None);
        assert_eq!(profile.measured_variable(""), None);
    }

    // ── Valve and equipment classification ──────────────────────────

    #[test]
    fn valve_standards_with_default() {
        let profile = StandardsProfile::default();
        assert_eq!(profile.valve_standard("Control Valve"), "ISA-5.1");
        assert_eq!(profile.valve_standard("Gate Valve"), "ISO 14617");
        assert_eq!(profile.valve_standard("Butterfly Valve"), "ISA-5.1");
    }

    #[test]
    fn equipment_classes_with_default() {
        let profile = StandardsProfile::default();
        assert_eq!(profile.equipment_class("Centrifugal Pump"), "Pump");
        assert_eq!(profile.equipment_class("Reboiler"), "Heat Exchanger");
        assert_eq!(profile.equipment_class("Flare Stack"), "Equipment");
    }

    // ── Line style inference ────────────────────────────────────────

    #[test]
    fn line_style_substring_match() {
        let profile = StandardsProfile::default();
        assert_eq!(profile.line_type_for_style("solid line"), Some("process"));
        assert_eq!(
            profile.line_type_for_style("Dashed"),
            Some("instrument_signal")
        );
        assert_eq!(
            profile.line_type_for_style("dot-dash"),
            Some("electrical_signal")
        );
        assert_eq!(profile.line_type_for_style("dotted"), Some("pneumatic"));
    }

    #[test]
    fn unrecognized_style_is_none() {
        let profile = StandardsProfile::default();
        assert_eq!(profile.line_type_for_style("wavy"), None);
    }

    #[test]
    fn four_standards_listed() {
        assert_eq!(STANDARDS_REFERENCED.len(), 4);
        assert!(STANDARDS_REFERENCED.contains(&"ISA-5.1"));
    }
}
