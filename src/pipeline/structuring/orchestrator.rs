use chrono::{Local, NaiveDate};

use super::catalog::{default_unit, GENERIC_UNIT};
use super::classify::{classify_value, RangeAssessment, RANGE_NOT_SPECIFIED};
use super::dates::find_report_date;
use super::entities::{extract_doctor_name, extract_lab_name};
use super::matcher::{match_analyte, match_generic, AnalyteMatch, GenericMatch};
use crate::config::{DateOrder, ExtractionConfig};
use crate::models::enums::{ExtractionTier, StatusTier};
use crate::models::ExtractedObservation;

/// Test name of the record emitted when nothing could be extracted.
pub const MANUAL_REVIEW_TEST_NAME: &str = "Manual Review Required";
pub const NOT_APPLICABLE: &str = "N/A";

const UNKNOWN_TEST_NAME: &str = "Unknown Test";

/// Entities found independently of the analyte.
struct ReportContext {
    date: NaiveDate,
    lab_name: String,
    doctor_name: String,
}

/// Turns recognized text into one [`ExtractedObservation`]:
/// catalog analyte, then generic labelled number, then manual review.
///
/// Holds no mutable state; one extractor can serve any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObservationExtractor {
    date_order: DateOrder,
}

impl ObservationExtractor {
    pub fn new(date_order: DateOrder) -> Self {
        Self { date_order }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.date_order)
    }

    /// Extract one observation. Never fails.
    pub fn extract(&self, text: &str, original_file: &str) -> ExtractedObservation {
        self.extract_with_tier(text, original_file).0
    }

    /// Extract one observation and report which fallback tier produced it.
    pub fn extract_with_tier(
        &self,
        text: &str,
        original_file: &str,
    ) -> (ExtractedObservation, ExtractionTier) {
        self.extract_on(text, original_file, Local::now().date_naive())
    }

    /// Same as [`extract_with_tier`](Self::extract_with_tier) with an
    /// explicit fallback date.
    pub fn extract_on(
        &self,
        text: &str,
        original_file: &str,
        today: NaiveDate,
    ) -> (ExtractedObservation, ExtractionTier) {
        let _span = tracing::info_span!(
            "extract_observation",
            file = %original_file,
            text_len = text.len(),
        )
        .entered();

        let context = ReportContext {
            date: find_report_date(text, self.date_order).unwrap_or(today),
            lab_name: extract_lab_name(text),
            doctor_name: extract_doctor_name(text),
        };

        let (observation, tier) = if let Some(hit) = match_analyte(text) {
            (from_analyte(hit, &context, text, original_file), ExtractionTier::Catalog)
        } else if let Some(hit) = match_generic(text) {
            (from_generic(hit, &context, text, original_file), ExtractionTier::Generic)
        } else {
            (manual_review(&context, text, original_file), ExtractionTier::ManualReview)
        };

        tracing::debug!(
            tier = tier.as_str(),
            test_name = %observation.test_name,
            status = observation.status.as_str(),
            "Observation extracted"
        );

        (observation, tier)
    }
}

/// Extract with default settings.
pub fn extract_observation(text: &str, original_file: &str) -> ExtractedObservation {
    ObservationExtractor::default().extract(text, original_file)
}

fn from_analyte(
    hit: AnalyteMatch,
    context: &ReportContext,
    text: &str,
    original_file: &str,
) -> ExtractedObservation {
    let definition = hit.definition;
    let unit = hit
        .unit
        .unwrap_or_else(|| default_unit(definition.key).to_string());
    let RangeAssessment {
        reference_range,
        status,
    } = match hit.value.parse::<f64>() {
        Ok(value) => classify_value(definition.key, value),
        Err(_) => RangeAssessment {
            reference_range: RANGE_NOT_SPECIFIED.to_string(),
            status: StatusTier::Normal,
        },
    };

    build(
        context,
        definition.display_name.to_string(),
        hit.value,
        unit,
        reference_range,
        status,
        text,
        original_file,
    )
}

fn from_generic(
    hit: GenericMatch,
    context: &ReportContext,
    text: &str,
    original_file: &str,
) -> ExtractedObservation {
    let GenericMatch { name, value, unit } = hit;
    build(
        context,
        non_empty_or(name, UNKNOWN_TEST_NAME),
        non_empty_or(value, "0"),
        unit.map_or_else(|| GENERIC_UNIT.to_string(), |u| non_empty_or(u, GENERIC_UNIT)),
        RANGE_NOT_SPECIFIED.to_string(),
        StatusTier::Normal,
        text,
        original_file,
    )
}

fn manual_review(context: &ReportContext, text: &str, original_file: &str) -> ExtractedObservation {
    build(
        context,
        MANUAL_REVIEW_TEST_NAME.to_string(),
        "0".to_string(),
        NOT_APPLICABLE.to_string(),
        NOT_APPLICABLE.to_string(),
        StatusTier::Normal,
        text,
        original_file,
    )
}

#[allow(clippy::too_many_arguments)]
fn build(
    context: &ReportContext,
    test_name: String,
    value: String,
    unit: String,
    reference_range: String,
    status: StatusTier,
    text: &str,
    original_file: &str,
) -> ExtractedObservation {
    ExtractedObservation {
        date: context.date,
        test_name,
        value,
        unit,
        reference_range,
        status,
        lab_name: context.lab_name.clone(),
        doctor_name: context.doctor_name.clone(),
        original_file: original_file.to_string(),
        source_text: text.to_string(),
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
