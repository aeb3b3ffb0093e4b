//! Static analyte catalog.
//!
//! One ordered list holds each analyte's match pattern, default unit and
//! reference range. List order is match priority: when a text mentions two
//! analytes, the one listed first wins. Do not reorder entries.

use std::sync::LazyLock;

use regex::Regex;

/// Unit reported when an analyte key is not in the catalog.
pub const GENERIC_UNIT: &str = "units";

/// Clinically normal interval for an analyte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRange {
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

/// A known analyte: how to find it in recognized text and how to judge it.
#[derive(Debug)]
pub struct AnalyteDefinition {
    /// Lowercase lookup key.
    pub key: &'static str,
    /// Name written into extracted observations.
    pub display_name: &'static str,
    /// Case-insensitive `<name> : <number> [<unit>]`. Group 1 is the value,
    /// group 2 the optional unit.
    pub pattern: Regex,
    pub default_unit: &'static str,
    pub reference_range: ReferenceRange,
}

// Unit fragments shared by the cell-count analytes.
const THOUSAND_PER_UL: &str = r"(?:[×x][ \t]*)?10(?:³|\^3)/[μµu]l";
const MILLION_PER_UL: &str = r"(?:[×x][ \t]*)?10(?:⁶|\^6)/[μµu]l";

/// Value capture shared by every analyte pattern.
const VALUE: &str = r"\s*:?\s*(\d+\.?\d*)[ \t]*";

pub static ANALYTE_CATALOG: LazyLock<Vec<AnalyteDefinition>> = LazyLock::new(|| {
    vec![
        analyte("hemoglobin", "Hemoglobin", r"hemoglobin", r"g/dl|mg/dl", "g/dL", 12.0, 16.0),
        analyte("glucose", "Glucose", r"glucose", r"mg/dl", "mg/dL", 70.0, 100.0),
        analyte("cholesterol", "Cholesterol", r"cholesterol", r"mg/dl", "mg/dL", 0.0, 200.0),
        analyte("wbc", "WBC", r"wbc", THOUSAND_PER_UL, "× 10³/μL", 4.0, 11.0),
        analyte("rbc", "RBC", r"rbc", MILLION_PER_UL, "× 10⁶/μL", 4.2, 5.4),
        analyte("platelets", "Platelets", r"platelets?", THOUSAND_PER_UL, "× 10³/μL", 150.0, 450.0),
        analyte("tsh", "TSH", r"tsh", r"miu/l", "mIU/L", 0.4, 4.0),
        analyte("vitamin d", "Vitamin D", r"vitamin\s*d(?:[23]\b)?", r"ng/ml", "ng/mL", 30.0, 100.0),
        analyte("blood sugar", "Blood Sugar", r"blood\s*sugar", r"mg/dl", "mg/dL", 70.0, 100.0),
        analyte("creatinine", "Creatinine", r"creatinine", r"mg/dl", "mg/dL", 0.6, 1.2),
    ]
});

fn analyte(
    key: &'static str,
    display_name: &'static str,
    name_pattern: &str,
    unit_pattern: &str,
    default_unit: &'static str,
    min: f64,
    max: f64,
) -> AnalyteDefinition {
    // No boundary after the name: OCR often drops the separator (`Hemoglobin14.2`).
    let source = format!(r"(?i)\b{name_pattern}{VALUE}({unit_pattern})?");
    AnalyteDefinition {
        key,
        display_name,
        pattern: Regex::new(&source).expect("Invalid analyte regex pattern"),
        default_unit,
        reference_range: ReferenceRange {
            min,
            max,
            unit: default_unit,
        },
    }
}

/// Look up a catalog entry by key (case-insensitive).
pub fn find_analyte(key: &str) -> Option<&'static AnalyteDefinition> {
    let lower = key.trim().to_lowercase();
    ANALYTE_CATALOG.iter().find(|a| a.key == lower)
}

/// Canonical unit for an analyte key, or [`GENERIC_UNIT`] when unknown.
pub fn default_unit(key: &str) -> &'static str {
    find_analyte(key).map_or(GENERIC_UNIT, |a| a.default_unit)
}

/// Reference range for an analyte key.
pub fn reference_range(key: &str) -> Option<ReferenceRange> {
    find_analyte(key).map(|a| a.reference_range)
}
