//! Sample report text used when no recognizer is available or it fails.

use chrono::NaiveDate;
use rand::Rng;

/// Placeholder replaced by the report date.
const DATE_SLOT: &str = "{date}";

const TEMPLATES: &[&str] = &[
    "Laboratory: City Medical Center\n\
     Patient: John Doe\n\
     Date: {date}\n\
     \n\
     Blood Test Results:\n\
     Hemoglobin: 14.2 g/dL (Normal Range: 12.0-16.0 g/dL)\n\
     Blood Sugar: 95 mg/dL (Normal Range: 70-100 mg/dL)\n\
     \n\
     Dr. Smith, MD\n",
    "Lab: Metro Diagnostics\n\
     Date: {date}\n\
     \n\
     Complete Blood Count:\n\
     WBC: 7.5 × 10³/μL (Range: 4.0-11.0)\n\
     Cholesterol: 185 mg/dL (Desirable: < 200 mg/dL)\n\
     \n\
     Dr. Johnson\n",
    "Clinic: Advanced Medical Center\n\
     Test Date: {date}\n\
     \n\
     Thyroid Function:\n\
     TSH: 2.8 mIU/L (0.4-4.0 mIU/L)\n\
     Vitamin D: 32 ng/mL (30-100 ng/mL)\n\
     \n\
     Dr. Williams, MD\n",
];

/// Produces plausible laboratory report text stamped with a given date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedTextSource;

impl SimulatedTextSource {
    pub fn template_count(&self) -> usize {
        TEMPLATES.len()
    }

    /// A randomly chosen template.
    pub fn generate(&self, date: NaiveDate) -> String {
        let index = rand::thread_rng().gen_range(0..TEMPLATES.len());
        self.template(index, date)
    }

    /// Template `index` (wrapping) with `date` written as `M/D/YYYY`.
    pub fn template(&self, index: usize, date: NaiveDate) -> String {
        let stamp = date.format("%-m/%-d/%Y").to_string();
        TEMPLATES[index % TEMPLATES.len()].replace(DATE_SLOT, &stamp)
    }
}
