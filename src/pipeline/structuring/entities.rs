//! Laboratory and physician name extraction.

use std::sync::LazyLock;

use regex::Regex;

pub const UNKNOWN_LAB: &str = "Unknown Lab";
pub const UNKNOWN_DOCTOR: &str = "Unknown Doctor";

const DOCTOR_PREFIX: &str = "Dr. ";

/// Institution keyword as a whole word, optional colon, then the rest of
/// that line.
static LAB_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:laboratory|diagnostics|pathology|medical|clinic|lab)\b[ \t]*:?[ \t]*([^\s:][^\n\r]*)",
    )
    .expect("Invalid lab regex pattern")
});

/// Report phrasings that introduce the physician, tried in order.
/// Group 1 is the name; names never span lines.
static PHYSICIAN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(?:dr\.?|doctor)[ \t]+([a-z][a-z \t]*[a-z])",
        r"(?i)\b([a-z]+[ \t]+[a-z]+)[ \t]*,?[ \t]*m\.?d\b\.?",
        r"(?i)\bphysician[ \t]*:?[ \t]*([a-z][a-z \t]*[a-z])",
        r"(?i)\bconsultant[ \t]*:?[ \t]*([a-z][a-z \t]*[a-z])",
        r"(?i)\battending[ \t]*:?[ \t]*([a-z][a-z \t]*[a-z])",
        r"(?i)\bsigned[ \t]*:?[ \t]*([a-z][a-z \t]*[a-z])",
        r"(?i)\breported[ \t]+by[ \t]*:?[ \t]*([a-z][a-z \t]*[a-z])",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("Invalid physician regex pattern"))
    .collect()
});

/// Laboratory name from the first line carrying an institution keyword.
pub fn extract_lab_name(text: &str) -> String {
    LAB_PATTERN
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_LAB.to_string())
}

/// Physician name from the first matching phrasing, normalized to
/// `Dr. Firstname Lastname`.
pub fn extract_doctor_name(text: &str) -> String {
    PHYSICIAN_PATTERNS
        .iter()
        .find_map(|re| re.captures(text).map(|caps| caps[1].to_string()))
        .map(|raw| normalize_physician_name(&raw))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_DOCTOR.to_string())
}

/// Collapse whitespace, title-case each word, add the `Dr. ` prefix if missing.
pub fn normalize_physician_name(raw: &str) -> String {
    let name = raw
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        return name;
    }
    if name.to_lowercase().starts_with(&DOCTOR_PREFIX.to_lowercase()) {
        name
    } else {
        format!("{DOCTOR_PREFIX}{name}")
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
