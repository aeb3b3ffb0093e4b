use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::StatusTier;

/// One structured result extracted from a processed report.
///
/// Built once per input and never mutated afterwards. `value` keeps the
/// numeral exactly as it appeared in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedObservation {
    pub date: NaiveDate,
    pub test_name: String,
    pub value: String,
    pub unit: String,
    pub reference_range: String,
    pub status: StatusTier,
    pub lab_name: String,
    pub doctor_name: String,
    pub original_file: String,
    pub source_text: String,
}
