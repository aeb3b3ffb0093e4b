//! Analyte and generic value matching.

use std::sync::LazyLock;

use regex::Regex;

use super::catalog::{AnalyteDefinition, ANALYTE_CATALOG};

/// A catalog analyte found in the text.
#[derive(Debug, Clone)]
pub struct AnalyteMatch {
    pub definition: &'static AnalyteDefinition,
    /// Numeral exactly as written.
    pub value: String,
    /// Unit written next to the value, if any.
    pub unit: Option<String>,
}

/// A `<word> : <number> [<unit>]` hit outside the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericMatch {
    pub name: String,
    pub value: String,
    pub unit: Option<String>,
}

// ASCII word characters only, so unit symbols are never taken for names.
static GENERIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z0-9_]+)\s*:?\s*(\d+\.?\d*)\s*([A-Za-z0-9_]+/[A-Za-z0-9_]+|[A-Za-z0-9_]+)?")
        .expect("Invalid generic value regex pattern")
});

/// First catalog entry, in catalog order, whose pattern occurs in `text`.
///
/// Priority comes from the catalog, not from where the analyte appears in
/// the text.
pub fn match_analyte(text: &str) -> Option<AnalyteMatch> {
    ANALYTE_CATALOG.iter().find_map(|definition| {
        let caps = definition.pattern.captures(text)?;
        Some(AnalyteMatch {
            definition,
            value: caps.get(1)?.as_str().to_string(),
            unit: caps
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .filter(|u| !u.is_empty()),
        })
    })
}

/// Any labelled number, used only when no catalog analyte matched.
pub fn match_generic(text: &str) -> Option<GenericMatch> {
    let caps = GENERIC_PATTERN.captures(text)?;
    Some(GenericMatch {
        name: caps.get(1)?.as_str().to_string(),
        value: caps.get(2)?.as_str().to_string(),
        unit: caps.get(3).map(|m| m.as_str().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_hemoglobin_with_unit() {
        let m = match_analyte("Hemoglobin: 14.2 g/dL").unwrap();
        assert_eq!(m.definition.key, "hemoglobin");
        assert_eq!(m.value, "14.2");
        assert_eq!(m.unit.as_deref(), Some("g/dL"));
    }

    #[test]
    fn unit_is_optional() {
        let m = match_analyte("creatinine 0.9").unwrap();
        assert_eq!(m.definition.key, "creatinine");
        assert_eq!(m.value, "0.9");
        assert!(m.unit.is_none());
    }

    #[test]
    fn catalog_order_beats_text_order() {
        let text = "Creatinine: 1.0 mg/dL\nCholesterol: 180 mg/dL\nGlucose: 92";
        let m = match_analyte(text).unwrap();
        assert_eq!(m.definition.key, "glucose");
    }

    #[test]
    fn glucose_listed_before_blood_sugar() {
        let text = "Blood Sugar: 95 mg/dL\nGlucose: 130 mg/dL";
        assert_eq!(match_analyte(text).unwrap().definition.key, "glucose");
    }

    #[test]
    fn no_analyte_in_plain_text() {
        assert!(match_analyte("Patient seen today, feeling well").is_none());
        assert!(match_analyte("").is_none());
    }

    #[test]
    fn analyte_name_without_number_is_not_a_match() {
        assert!(match_analyte("Hemoglobin: pending").is_none());
    }

    #[test]
    fn generic_word_number_unit() {
        let m = match_generic("Foo: 42 bar").unwrap();
        assert_eq!(
            m,
            GenericMatch {
                name: "Foo".into(),
                value: "42".into(),
                unit: Some("bar".into()),
            }
        );
    }

    #[test]
    fn generic_takes_slash_unit() {
        let m = match_generic("Ferritin 85 ng/mL").unwrap();
        assert_eq!(m.name, "Ferritin");
        assert_eq!(m.value, "85");
        assert_eq!(m.unit.as_deref(), Some("ng/mL"));
    }

    #[test]
    fn generic_without_unit() {
        let m = match_generic("Score: 7.5").unwrap();
        assert_eq!(m.value, "7.5");
        assert!(m.unit.is_none());
    }

    #[test]
    fn generic_needs_a_number() {
        assert!(match_generic("xyz").is_none());
        assert!(match_generic("").is_none());
    }
}
