use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "MedTrack";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Database file name inside the application data directory.
pub const DATABASE_FILE: &str = "medtrack.db";

/// Get the application data directory
/// ~/MedTrack/ on all platforms. Falls back to the working directory when
/// no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the report database path, honouring `MEDTRACK_DB` when set.
pub fn database_path() -> PathBuf {
    match std::env::var("MEDTRACK_DB") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => app_data_dir().join(DATABASE_FILE),
    }
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medtrack_lib=info,medtrack=info"
}

/// How the numeric `D/M/Y` date shape is read.
///
/// Numeric dates are ambiguous; this is the locale choice applied to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `03/04/2024` is March 4th.
    #[default]
    MonthFirst,
    /// `03/04/2024` is April 3rd.
    DayFirst,
}

impl std::str::FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month_first" | "mdy" | "us" => Ok(Self::MonthFirst),
            "day_first" | "dmy" | "eu" => Ok(Self::DayFirst),
            other => Err(format!("unknown date order: {other}")),
        }
    }
}

/// Runtime settings for recognition and extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Language tag handed to the text recognizer.
    pub ocr_language: String,
    pub date_order: DateOrder,
    /// Run dictionary correction on recognized text before extraction.
    pub correct_ocr_terms: bool,
    pub vision_url: String,
    pub vision_model: String,
    pub vision_timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ocr_language: "eng".into(),
            date_order: DateOrder::MonthFirst,
            correct_ocr_terms: false,
            vision_url: "http://localhost:11434".into(),
            vision_model: "llava".into(),
            vision_timeout_secs: 120,
        }
    }
}

impl ExtractionConfig {
    /// Defaults overridden by `MEDTRACK_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test map).
    /// Values that fail to parse keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(lang) = lookup("MEDTRACK_OCR_LANG").filter(|v| !v.trim().is_empty()) {
            config.ocr_language = lang.trim().to_string();
        }
        if let Some(raw) = lookup("MEDTRACK_DATE_ORDER") {
            match raw.parse() {
                Ok(order) => config.date_order = order,
                Err(e) => tracing::warn!(value = %raw, error = %e, "Ignoring MEDTRACK_DATE_ORDER"),
            }
        }
        if let Some(raw) = lookup("MEDTRACK_CORRECT_TERMS") {
            match parse_flag(&raw) {
                Some(flag) => config.correct_ocr_terms = flag,
                None => tracing::warn!(value = %raw, "Ignoring MEDTRACK_CORRECT_TERMS"),
            }
        }
        if let Some(url) = lookup("MEDTRACK_VISION_URL").filter(|v| !v.trim().is_empty()) {
            config.vision_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("MEDTRACK_VISION_MODEL").filter(|v| !v.trim().is_empty()) {
            config.vision_model = model.trim().to_string();
        }
        if let Some(raw) = lookup("MEDTRACK_VISION_TIMEOUT") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.vision_timeout_secs = secs,
                _ => tracing::warn!(value = %raw, "Ignoring MEDTRACK_VISION_TIMEOUT"),
            }
        }

        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
