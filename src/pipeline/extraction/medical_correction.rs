//! Post-OCR correction of laboratory terms.
//!
//! A word is replaced only when it is close to exactly one dictionary term.
//! Words shorter than 8 characters tolerate one edit, longer words two.

/// Lowercase, sorted for binary search.
const LAB_TERMS: &[&str] = &[
    "attending", "cholesterol", "consultant", "creatinine", "glucose",
    "hemoglobin", "laboratory", "pathology", "physician", "platelets",
    "vitamin",
];

const MIN_WORD_LEN: usize = 5;
const LONG_WORD_LEN: usize = 8;

/// Correct near-miss spellings of laboratory terms, keeping everything
/// else (separators, numbers, unknown words) untouched.
pub fn correct_medical_terms(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut word = String::new();

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            word.push(ch);
        } else {
            if !word.is_empty() {
                result.push_str(&correct_word(&word));
                word.clear();
            }
            result.push(ch);
        }
    }
    if !word.is_empty() {
        result.push_str(&correct_word(&word));
    }

    result
}

fn correct_word(word: &str) -> String {
    let len = word.chars().count();
    if len < MIN_WORD_LEN {
        return word.to_string();
    }

    let lower = word.to_lowercase();
    if LAB_TERMS.binary_search(&lower.as_str()).is_ok() {
        return word.to_string();
    }

    let max_distance = if len < LONG_WORD_LEN { 1 } else { 2 };
    let mut best: Option<(&str, usize)> = None;
    let mut ambiguous = false;

    for &term in LAB_TERMS {
        let distance = strsim::levenshtein(&lower, term);
        if distance > max_distance {
            continue;
        }
        match best {
            Some((_, d)) if distance == d => ambiguous = true,
            Some((_, d)) if distance > d => {}
            _ => {
                best = Some((term, distance));
                ambiguous = false;
            }
        }
    }

    match best {
        Some((term, _)) if !ambiguous => {
            tracing::debug!(from = word, to = term, "Corrected OCR term");
            preserve_case(word, term)
        }
        _ => word.to_string(),
    }
}

/// Apply the capitalization style of `original` (UPPER, Title, lower).
fn preserve_case(original: &str, correction: &str) -> String {
    if original.chars().all(|c| c.is_uppercase() || !c.is_alphabetic()) {
        return correction.to_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = correction.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    correction.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_are_sorted() {
        assert!(LAB_TERMS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn fixes_common_misreads() {
        assert_eq!(correct_medical_terms("Hemoglobim: 14.2"), "Hemoglobin: 14.2");
        assert_eq!(correct_medical_terms("creatinlne 0.9"), "creatinine 0.9");
        assert_eq!(correct_medical_terms("GLUC0SE 90"), "GLUCOSE 90");
    }

    #[test]
    fn two_edits_allowed_on_long_words() {
        assert_eq!(correct_medical_terms("Cholestrl 180"), "Cholesterol 180");
    }

    #[test]
    fn short_words_need_close_match() {
        // "tablets" is two edits from "platelets" and too short for that.
        assert_eq!(correct_medical_terms("tablets"), "tablets");
        assert_eq!(correct_medical_terms("TSH"), "TSH");
    }

    #[test]
    fn exact_terms_and_unknown_words_untouched() {
        let text = "Patient: John Doe\nGlucose: 90 mg/dL";
        assert_eq!(correct_medical_terms(text), text);
    }

    #[test]
    fn separators_preserved() {
        assert_eq!(correct_medical_terms("  Vitamln-D\t32  "), "  Vitamin-D\t32  ");
    }

    #[test]
    fn empty_input() {
        assert_eq!(correct_medical_terms(""), "");
    }
}
