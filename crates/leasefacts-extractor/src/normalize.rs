//! Normalizers for captured dates, numbers, amounts and percentages
//!
//! Every function here is pure and total: a value that cannot be normalized
//! comes back as `None` and never as an error.

use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

const MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

const ORDINAL: &str = r"(?:st|nd|rd|th)?";

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})\b").unwrap());

static NUMERIC_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[-/.](\d{1,2})[-/.](\d{4}|\d{2})\b").unwrap());

/// `March 1, 2023`, `Mar. 1st 2023`
static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b{MONTH}\s+(\d{{1,2}}){ORDINAL}(?:,\s*|\s+)(\d{{4}})\b"
    ))
    .unwrap()
});

/// `1 March 2023`, `1st day of March, 2023`, `15th of March 2023`, `1-Mar-2023`
static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}}){ORDINAL}(?:\s+(?:day\s+)?of)?[\s\-/]+{MONTH}(?:,\s*|[\s\-/]+)(\d{{4}})\b"
    ))
    .unwrap()
});

/// `March 2023`
static MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b{MONTH}(?:,\s*|\s+)(\d{{4}})\b")).unwrap()
});

/// A day number ending right before a month name (`31st of `)
static DAY_BEFORE_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b\d{{1,2}}{ORDINAL}(?:\s+day)?(?:\s+of)?[\s\-/]+$")).unwrap()
});

/// Canonical output format for dates
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Normalize a free-form date phrase to `DD-MM-YYYY`
///
/// The earliest recognizable date in the phrase wins; surrounding words are
/// ignored. Ambiguous numeric dates are read month first.
pub fn normalize_date(phrase: &str) -> Option<String> {
    let found = [
        first_date(&ISO_DATE, phrase, |c| ymd(num(c, 1)?, num(c, 2)?, num(c, 3)?)),
        first_date(&NUMERIC_DATE, phrase, numeric_date),
        first_date(&MONTH_DAY_YEAR, phrase, |c| {
            ymd(num(c, 3)?, month_number(c.get(1)?.as_str())?, num(c, 2)?)
        }),
        first_date(&DAY_MONTH_YEAR, phrase, |c| {
            ymd(num(c, 3)?, month_number(c.get(2)?.as_str())?, num(c, 1)?)
        }),
        first_date(&MONTH_YEAR, phrase, |c| {
            // A stated day that failed to form a date must not fall back to the 1st
            let start = c.get(0)?.start();
            if DAY_BEFORE_MONTH.is_match(&phrase[..start]) {
                return None;
            }
            ymd(num(c, 2)?, month_number(c.get(1)?.as_str())?, 1)
        }),
    ]
    .into_iter()
    .flatten()
    .min_by_key(|(position, _)| *position);

    match found {
        Some((_, date)) => Some(date.format(DATE_FORMAT).to_string()),
        None => {
            debug!("No date recognized in {:?}", phrase);
            None
        }
    }
}

/// First match of `pattern` that forms a real calendar date, with its offset
fn first_date<F>(pattern: &Regex, phrase: &str, build: F) -> Option<(usize, NaiveDate)>
where
    F: Fn(&Captures<'_>) -> Option<NaiveDate>,
{
    pattern.captures_iter(phrase).find_map(|caps| {
        let start = caps.get(0)?.start();
        build(&caps).map(|date| (start, date))
    })
}

fn num(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

fn ymd(year: u32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

/// `A/B/Y`: month first unless `A` cannot be a month
fn numeric_date(caps: &Captures<'_>) -> Option<NaiveDate> {
    let first = num(caps, 1)?;
    let second = num(caps, 2)?;
    let year_raw = caps.get(3)?.as_str();
    let mut year: u32 = year_raw.parse().ok()?;
    if year_raw.len() == 2 {
        year += if year <= 68 { 2000 } else { 1900 };
    }
    let (month, day) = if first > 12 { (second, first) } else { (first, second) };
    ymd(year, month, day)
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_ascii_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Keep only digits and the decimal point
///
/// Trailing dots (sentence punctuation) are dropped. Returns `None` when no
/// digit remains.
pub fn normalize_number(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let cleaned = cleaned.trim_end_matches('.');
    if cleaned.chars().any(|c| c.is_ascii_digit()) {
        Some(cleaned.to_string())
    } else {
        None
    }
}

/// Normalize a money amount to digits with two decimal places
pub fn normalize_currency(raw: &str) -> Option<String> {
    let number = normalize_number(raw)?;
    let (whole, cents) = match number.split_once('.') {
        Some((_, cents)) if cents.contains('.') => return None,
        Some((whole, cents)) => (whole, cents),
        None => (number.as_str(), ""),
    };
    let whole = if whole.is_empty() { "0" } else { whole };
    let cents: String = cents.chars().chain("00".chars()).take(2).collect();
    Some(format!("{}.{}", whole, cents))
}

/// Remove whitespace inside a percentage (`4.5 %` becomes `4.5%`)
pub fn normalize_percentage(raw: &str) -> Option<String> {
    let compact: String = raw.split_whitespace().collect();
    if compact.ends_with('%') && compact.len() > 1 {
        Some(compact)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_name_dates() {
        assert_eq!(normalize_date("March 1, 2023").as_deref(), Some("01-03-2023"));
        assert_eq!(normalize_date("Mar. 1st 2023").as_deref(), Some("01-03-2023"));
        assert_eq!(normalize_date("September 30,2025").as_deref(), Some("30-09-2025"));
        assert_eq!(normalize_date("Sept 5 2024").as_deref(), Some("05-09-2024"));
    }

    #[test]
    fn test_day_first_month_names() {
        assert_eq!(normalize_date("1 March 2023").as_deref(), Some("01-03-2023"));
        assert_eq!(normalize_date("the 15th day of June, 2024").as_deref(), Some("15-06-2024"));
        assert_eq!(normalize_date("1-Mar-2023").as_deref(), Some("01-03-2023"));
        assert_eq!(normalize_date("15th of March, 2023").as_deref(), Some("15-03-2023"));
        assert_eq!(normalize_date("the 20th of June 2024").as_deref(), Some("20-06-2024"));
    }

    #[test]
    fn test_impossible_day_does_not_default_to_first() {
        assert_eq!(normalize_date("31st of February, 2023"), None);
        assert_eq!(normalize_date("30 February 2023"), None);
        assert_eq!(normalize_date("the 31st day of April, 2024"), None);
    }

    #[test]
    fn test_month_and_year_defaults_to_first() {
        assert_eq!(normalize_date("December 2030").as_deref(), Some("01-12-2030"));
    }

    #[test]
    fn test_numeric_dates_prefer_month_first() {
        assert_eq!(normalize_date("03/01/2023").as_deref(), Some("01-03-2023"));
        assert_eq!(normalize_date("25/12/2023").as_deref(), Some("25-12-2023"));
        assert_eq!(normalize_date("1/2/24").as_deref(), Some("02-01-2024"));
        assert_eq!(normalize_date("1/2/99").as_deref(), Some("02-01-1999"));
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(normalize_date("2023-03-01").as_deref(), Some("01-03-2023"));
        assert_eq!(normalize_date("2023/3/1").as_deref(), Some("01-03-2023"));
    }

    #[test]
    fn test_fuzzy_capture_with_surrounding_words() {
        let phrase = r#"shall be March 1, 2023 (the "Commencement Date"), subject to Section 3"#;
        assert_eq!(normalize_date(phrase).as_deref(), Some("01-03-2023"));
    }

    #[test]
    fn test_earliest_date_wins() {
        let phrase = "the later of 04/15/2023 or May 1, 2023";
        assert_eq!(normalize_date(phrase).as_deref(), Some("15-04-2023"));
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(normalize_date("upon substantial completion"), None);
        assert_eq!(normalize_date("February 30, 2023"), None);
        assert_eq!(normalize_date("13/45/2023"), None);
        assert_eq!(normalize_date("March 1"), None);
        assert_eq!(normalize_date(""), None);
    }

    #[test]
    fn test_normalize_number() {
        assert_eq!(normalize_number("12,345").as_deref(), Some("12345"));
        assert_eq!(normalize_number("1,234.50").as_deref(), Some("1234.50"));
        assert_eq!(normalize_number("12,345.").as_deref(), Some("12345"));
        assert_eq!(normalize_number(",."), None);
    }

    #[test]
    fn test_normalize_currency() {
        assert_eq!(normalize_currency("5,000").as_deref(), Some("5000.00"));
        assert_eq!(normalize_currency("1234.5").as_deref(), Some("1234.50"));
        assert_eq!(normalize_currency("$12,500.00").as_deref(), Some("12500.00"));
        assert_eq!(normalize_currency(".75").as_deref(), Some("0.75"));
        assert_eq!(normalize_currency("1.234.56"), None);
        assert_eq!(normalize_currency("none"), None);
    }

    #[test]
    fn test_normalize_percentage() {
        assert_eq!(normalize_percentage("4.5 %").as_deref(), Some("4.5%"));
        assert_eq!(normalize_percentage("12%").as_deref(), Some("12%"));
        assert_eq!(normalize_percentage("%"), None);
        assert_eq!(normalize_percentage("12"), None);
    }
}
