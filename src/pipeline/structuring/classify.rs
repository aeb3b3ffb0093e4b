use super::catalog::{reference_range, ReferenceRange};
use crate::models::enums::StatusTier;

/// Reference range text when the analyte has no known range.
pub const RANGE_NOT_SPECIFIED: &str = "Not specified";

/// Values above `max * CRITICAL_MULTIPLIER` are critical.
///
/// Applied uniformly to every analyte. This is a simplification, not a
/// clinically validated threshold.
pub const CRITICAL_MULTIPLIER: f64 = 1.5;

/// Reference range text and status tier for one value.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeAssessment {
    pub reference_range: String,
    pub status: StatusTier,
}

impl RangeAssessment {
    fn unspecified() -> Self {
        Self {
            reference_range: RANGE_NOT_SPECIFIED.to_string(),
            status: StatusTier::Normal,
        }
    }
}

/// Classify `value` against the catalog range for `key`.
/// Unknown keys are "Not specified" / normal.
pub fn classify_value(key: &str, value: f64) -> RangeAssessment {
    match reference_range(key) {
        Some(range) => RangeAssessment {
            reference_range: format_range(&range),
            status: status_for(&range, value),
        },
        None => RangeAssessment::unspecified(),
    }
}

/// Status decision, checked in order: below min, above the critical bound,
/// above max, otherwise normal. Both bounds are inclusive-normal.
pub fn status_for(range: &ReferenceRange, value: f64) -> StatusTier {
    if value < range.min {
        StatusTier::Low
    } else if value > range.max && value > range.max * CRITICAL_MULTIPLIER {
        StatusTier::Critical
    } else if value > range.max {
        StatusTier::High
    } else {
        StatusTier::Normal
    }
}

/// `"<min>-<max> <unit>"` with integral bounds printed without decimals.
pub fn format_range(range: &ReferenceRange) -> String {
    format!("{}-{} {}", range.min, range.max, range.unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hemoglobin_normal() {
        let a = classify_value("hemoglobin", 14.2);
        assert_eq!(a.reference_range, "12-16 g/dL");
        assert_eq!(a.status, StatusTier::Normal);
    }

    #[test]
    fn glucose_critical_above_one_and_a_half_max() {
        assert_eq!(classify_value("glucose", 250.0).status, StatusTier::Critical);
    }

    #[test]
    fn tsh_low() {
        let a = classify_value("tsh", 0.2);
        assert_eq!(a.status, StatusTier::Low);
        assert_eq!(a.reference_range, "0.4-4 mIU/L");
    }

    #[test]
    fn boundaries_are_normal() {
        assert_eq!(classify_value("glucose", 70.0).status, StatusTier::Normal);
        assert_eq!(classify_value("glucose", 100.0).status, StatusTier::Normal);
    }

    #[test]
    fn just_below_min_is_low() {
        assert_eq!(classify_value("glucose", 69.999).status, StatusTier::Low);
    }

    #[test]
    fn exactly_critical_bound_is_high() {
        assert_eq!(classify_value("glucose", 150.0).status, StatusTier::High);
        assert_eq!(classify_value("glucose", 150.0001).status, StatusTier::Critical);
    }

    #[test]
    fn between_max_and_critical_is_high() {
        assert_eq!(classify_value("creatinine", 1.5).status, StatusTier::High);
    }

    #[test]
    fn unknown_analyte_unspecified() {
        let a = classify_value("ferritin", 5000.0);
        assert_eq!(a.reference_range, RANGE_NOT_SPECIFIED);
        assert_eq!(a.status, StatusTier::Normal);
    }

    #[test]
    fn range_text_keeps_fractional_bounds() {
        assert_eq!(classify_value("rbc", 5.0).reference_range, "4.2-5.4 × 10⁶/μL");
        assert_eq!(classify_value("cholesterol", 5.0).reference_range, "0-200 mg/dL");
    }

    #[test]
    fn nan_is_normal() {
        assert_eq!(classify_value("glucose", f64::NAN).status, StatusTier::Normal);
    }
}
