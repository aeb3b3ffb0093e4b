//! Report date extraction.
//!
//! Date shapes are tried in a fixed order. Only the first occurrence of each
//! shape is considered; when it does not form a real calendar date the next
//! shape is tried. With nothing usable the caller's "today" is returned.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::{Captures, Regex};

use crate::config::DateOrder;

struct DatePattern {
    regex: Regex,
    parse: fn(&Captures<'_>, DateOrder) -> Option<NaiveDate>,
}

static DATE_PATTERNS: LazyLock<Vec<DatePattern>> = LazyLock::new(|| {
    vec![
        // 15/08/2024, 8-15-24
        date_pattern(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})\b", parse_numeric),
        // 15 March 2024, 3 Sept. 24
        date_pattern(r"\b(\d{1,2})\s+([A-Za-z]+)\.?,?\s+(\d{2,4})\b", parse_textual),
        // 2024-08-15, 2024/8/5
        date_pattern(r"\b(\d{4})[/-](\d{1,2})[/-](\d{1,2})\b", parse_iso_like),
    ]
});

fn date_pattern(
    regex_str: &str,
    parse: fn(&Captures<'_>, DateOrder) -> Option<NaiveDate>,
) -> DatePattern {
    DatePattern {
        regex: Regex::new(regex_str).expect("Invalid date regex pattern"),
        parse,
    }
}

/// Report date found in `text`, or today's local date.
pub fn extract_report_date(text: &str, order: DateOrder) -> NaiveDate {
    find_report_date(text, order).unwrap_or_else(|| Local::now().date_naive())
}

/// First date shape in `text` that forms a valid calendar date.
pub fn find_report_date(text: &str, order: DateOrder) -> Option<NaiveDate> {
    DATE_PATTERNS.iter().find_map(|p| {
        let caps = p.regex.captures(text)?;
        let parsed = (p.parse)(&caps, order);
        if parsed.is_none() {
            tracing::debug!(fragment = &caps[0], "Date fragment did not parse, trying next shape");
        }
        parsed
    })
}

fn parse_numeric(caps: &Captures<'_>, order: DateOrder) -> Option<NaiveDate> {
    let first: u32 = caps[1].parse().ok()?;
    let second: u32 = caps[2].parse().ok()?;
    let year = expand_year(&caps[3])?;
    let (month, day) = match order {
        DateOrder::MonthFirst => (first, second),
        DateOrder::DayFirst => (second, first),
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_textual(caps: &Captures<'_>, _order: DateOrder) -> Option<NaiveDate> {
    let day: u32 = caps[1].parse().ok()?;
    let month = month_from_name(&caps[2])?;
    let year = expand_year(&caps[3])?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_iso_like(caps: &Captures<'_>, _order: DateOrder) -> Option<NaiveDate> {
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Two-digit years pivot at 50: `24` is 2024, `85` is 1985.
/// Three-digit years are rejected.
fn expand_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.parse().ok()?;
    match raw.len() {
        2 if year < 50 => Some(2000 + year),
        2 => Some(1900 + year),
        4 => Some(year),
        _ => None,
    }
}

/// English month names and their common abbreviations.
fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn numeric_month_first() {
        assert_eq!(
            find_report_date("Date: 03/15/2024", DateOrder::MonthFirst),
            Some(ymd(2024, 3, 15))
        );
    }

    #[test]
    fn numeric_day_first() {
        assert_eq!(
            find_report_date("Date: 15-03-2024", DateOrder::DayFirst),
            Some(ymd(2024, 3, 15))
        );
    }

    #[test]
    fn numeric_two_digit_year_pivots() {
        assert_eq!(
            find_report_date("collected 1/2/24", DateOrder::MonthFirst),
            Some(ymd(2024, 1, 2))
        );
        assert_eq!(
            find_report_date("DOB 1/2/85", DateOrder::MonthFirst),
            Some(ymd(1985, 1, 2))
        );
    }

    #[test]
    fn invalid_numeric_falls_through_to_textual() {
        // Month 15 is impossible when reading month-first.
        let text = "Ref 15/08/2024 collected 3 March 2024";
        assert_eq!(
            find_report_date(text, DateOrder::MonthFirst),
            Some(ymd(2024, 3, 3))
        );
    }

    #[test]
    fn textual_dates() {
        assert_eq!(
            find_report_date("Reported 15 August 2024", DateOrder::MonthFirst),
            Some(ymd(2024, 8, 15))
        );
        assert_eq!(
            find_report_date("Reported 3 Sept. 24", DateOrder::MonthFirst),
            Some(ymd(2024, 9, 3))
        );
    }

    #[test]
    fn non_month_word_falls_through_to_iso() {
        let text = "Range 12 to 16\nCollected 2024-08-15";
        assert_eq!(
            find_report_date(text, DateOrder::MonthFirst),
            Some(ymd(2024, 8, 15))
        );
    }

    #[test]
    fn iso_date_is_not_mistaken_for_numeric_shape() {
        assert_eq!(
            find_report_date("Collected 2024-03-15", DateOrder::DayFirst),
            Some(ymd(2024, 3, 15))
        );
        assert_eq!(
            find_report_date("Collected 2024/3/5", DateOrder::MonthFirst),
            Some(ymd(2024, 3, 5))
        );
    }

    #[test]
    fn impossible_calendar_date_is_none() {
        assert_eq!(find_report_date("2024-02-30", DateOrder::MonthFirst), None);
        assert_eq!(find_report_date("31 February 2024", DateOrder::MonthFirst), None);
    }

    #[test]
    fn no_date_defaults_to_today() {
        let before = Local::now().date_naive();
        let date = extract_report_date("Hemoglobin: 14.2", DateOrder::MonthFirst);
        let after = Local::now().date_naive();
        assert!(date == before || date == after);
    }

    #[test]
    fn three_digit_year_rejected() {
        assert_eq!(expand_year("202"), None);
        assert_eq!(expand_year("2024"), Some(2024));
    }

    #[test]
    fn month_names_case_insensitive() {
        assert_eq!(month_from_name("MARCH"), Some(3));
        assert_eq!(month_from_name("Dec"), Some(12));
        assert_eq!(month_from_name("tablets"), None);
    }
}
