//! Duration calculation: "March 2020 – Present" → "1 year 10 months".
//!
//! Everything here is pure. "Present" resolves to the `today` argument, never
//! to the system clock, so the caller decides which day the résumé is
//! rendered on (the CLI passes the local date, tests pass fixed dates).
//!
//! A date string that cannot be understood is not an error. The calculator
//! answers `None` and the renderer shows the date range without a phrase.
//!
//! ## Rounding
//!
//! Partial months are truncated: the span counts calendar months, minus one
//! when the end's day-of-month falls before the start's. `2020-03-20` to
//! `2020-04-19` is 0 months; to `2020-04-20` it is 1 month.
//!
//! ## Capability flag
//!
//! The free-form date parser is compiled only with the `durations` feature.
//! Without it [`is_available`] is false and every phrase is skipped.

use crate::model::{DateRange, EndDate};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether duration phrases can be computed at all in this build.
pub fn is_available() -> bool {
    cfg!(feature = "durations")
}

/// A whole number of years and months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Elapsed {
    pub years: u32,
    pub months: u32,
}

impl Elapsed {
    pub fn from_months(total: u32) -> Self {
        Self {
            years: total / 12,
            months: total % 12,
        }
    }

    pub fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: u32| if n == 1 { "" } else { "s" };
        match (self.years, self.months) {
            (0, m) => write!(f, "{m} month{}", plural(m)),
            (y, 0) => write!(f, "{y} year{}", plural(y)),
            (y, m) => write!(f, "{y} year{} {m} month{}", plural(y), plural(m)),
        }
    }
}

/// True when an end-date label means "still ongoing".
pub fn is_present_sentinel(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    lower.contains("present") || lower.contains("current") || lower == "now" || lower == "today"
}

/// Elapsed time between two free-form dates.
///
/// `end` may be a "Present"-style sentinel, which resolves to `today`.
/// Returns `None` when either side is unparseable, the span is negative, or
/// it is shorter than one month.
pub fn elapsed_between(start: &str, end: &str, today: NaiveDate) -> Option<Elapsed> {
    let start = parse_date(start)?;
    let end = if is_present_sentinel(end) {
        today
    } else {
        parse_date(end)?
    };
    let elapsed = Elapsed::from_months(months_between(start, end)?);
    (elapsed.total_months() > 0).then_some(elapsed)
}

/// The duration phrase for a parsed date range, or `None` when disabled,
/// unavailable, or not computable.
pub fn duration_phrase(range: &DateRange, today: NaiveDate, enabled: bool) -> Option<String> {
    if !enabled || !is_available() {
        return None;
    }
    let elapsed = match &range.end {
        EndDate::Present(label) => elapsed_between(&range.start, label, today),
        EndDate::On(end) => elapsed_between(&range.start, end, today),
        EndDate::Unspecified => None,
    };
    elapsed.map(|e| e.to_string())
}

/// Whole calendar months from `start` to `end`, truncating a partial month.
/// `None` when `end` precedes `start`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> Option<u32> {
    if end < start {
        return None;
    }
    let mut months =
        (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() < start.day() {
        months -= 1;
    }
    u32::try_from(months).ok()
}

/// Best-effort parse of a free-form date such as `March 2020`, `Sept. 2019`,
/// `2021-06`, `06/2021` or `March 15, 2020`. A missing day means the 1st; a
/// bare year means January.
#[cfg(feature = "durations")]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    fuzzy::parse(text)
}

#[cfg(not(feature = "durations"))]
pub fn parse_date(_text: &str) -> Option<NaiveDate> {
    None
}

#[cfg(feature = "durations")]
mod fuzzy {
    use chrono::NaiveDate;
    use once_cell::sync::Lazy;
    use regex::Regex;

    static RE_ISO: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^(\d{4})[-/.](\d{1,2})(?:[-/.](\d{1,2}))?$").unwrap()
    });

    static RE_MONTH_YEAR_NUMERIC: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(\d{1,2})[-/.](\d{4})$").unwrap());

    static RE_US_FULL: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap());

    static RE_MONTH_NAME: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b\.?",
        )
        .unwrap()
    });

    static RE_SEASON: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\b(spring|summer|fall|autumn|winter)\b").unwrap());

    static RE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").unwrap());

    static RE_DAY: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)?\b").unwrap());

    pub(super) fn parse(text: &str) -> Option<NaiveDate> {
        let s = text.trim().trim_end_matches(['.', ',']);
        if s.is_empty() {
            return None;
        }

        if let Some(c) = RE_ISO.captures(s) {
            let day = c.get(3).map_or(Some(1), |d| d.as_str().parse().ok())?;
            return ymd(c[1].parse().ok()?, c[2].parse().ok()?, day);
        }
        if let Some(c) = RE_MONTH_YEAR_NUMERIC.captures(s) {
            return ymd(c[2].parse().ok()?, c[1].parse().ok()?, 1);
        }
        if let Some(c) = RE_US_FULL.captures(s) {
            return ymd(c[3].parse().ok()?, c[1].parse().ok()?, c[2].parse().ok()?);
        }

        let year_match = RE_YEAR.find(s)?;
        let year: i32 = year_match.as_str().parse().ok()?;

        if let Some(m) = RE_MONTH_NAME.captures(s) {
            let month = month_number(&m[1])?;
            // A day is any other 1–2 digit number, e.g. "March 15, 2020".
            let rest = format!("{}{}", &s[..year_match.start()], &s[year_match.end()..]);
            let day = RE_DAY
                .captures_iter(&rest)
                .filter_map(|d| d[1].parse::<u32>().ok())
                .find(|d| (1..=31).contains(d))
                .unwrap_or(1);
            return ymd(year, month, day).or_else(|| ymd(year, month, 1));
        }

        if let Some(c) = RE_SEASON.captures(s) {
            let month = match c[1].to_lowercase().as_str() {
                "spring" => 3,
                "summer" => 6,
                "fall" | "autumn" => 9,
                _ => 12,
            };
            return ymd(year, month, 1);
        }

        // A bare year, possibly with noise ("2019 (contract)").
        ymd(year, 1, 1)
    }

    fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn month_number(name: &str) -> Option<u32> {
        let key: String = name.to_lowercase().chars().take(3).collect();
        let n = match key.as_str() {
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
        Some(n)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_elapsed_display() {
        assert_eq!(Elapsed::from_months(22).to_string(), "1 year 10 months");
        assert_eq!(Elapsed::from_months(1).to_string(), "1 month");
        assert_eq!(Elapsed::from_months(5).to_string(), "5 months");
        assert_eq!(Elapsed::from_months(24).to_string(), "2 years");
        assert_eq!(Elapsed::from_months(13).to_string(), "1 year 1 month");
    }

    #[test]
    fn test_months_between_truncates_partial_month() {
        assert_eq!(months_between(date(2020, 3, 20), date(2020, 4, 19)), Some(0));
        assert_eq!(months_between(date(2020, 3, 20), date(2020, 4, 20)), Some(1));
        assert_eq!(months_between(date(2020, 3, 1), date(2022, 1, 15)), Some(22));
        assert_eq!(months_between(date(2022, 1, 1), date(2020, 1, 1)), None);
    }

    #[test]
    fn test_present_sentinel() {
        assert!(is_present_sentinel("Present"));
        assert!(is_present_sentinel("current"));
        assert!(is_present_sentinel(" Now "));
        assert!(!is_present_sentinel("November 2021"));
    }

    #[cfg(feature = "durations")]
    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("March 2020"), Some(date(2020, 3, 1)));
        assert_eq!(parse_date("Mar 2020"), Some(date(2020, 3, 1)));
        assert_eq!(parse_date("Sept. 2019"), Some(date(2019, 9, 1)));
        assert_eq!(parse_date("March 15, 2020"), Some(date(2020, 3, 15)));
        assert_eq!(parse_date("15 March 2020"), Some(date(2020, 3, 15)));
        assert_eq!(parse_date("2021-06"), Some(date(2021, 6, 1)));
        assert_eq!(parse_date("2021-06-30"), Some(date(2021, 6, 30)));
        assert_eq!(parse_date("06/2021"), Some(date(2021, 6, 1)));
        assert_eq!(parse_date("2018"), Some(date(2018, 1, 1)));
        assert_eq!(parse_date("Summer 2017"), Some(date(2017, 6, 1)));
    }

    #[cfg(feature = "durations")]
    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("sometime"), None);
        assert_eq!(parse_date("2021-13"), None);
        assert_eq!(parse_date("March"), None);
    }

    #[cfg(feature = "durations")]
    #[test]
    fn test_march_2020_to_present_in_january_2022() {
        let today = date(2022, 1, 15);
        let e = elapsed_between("March 2020", "Present", today).unwrap();
        assert_eq!(e.to_string(), "1 year 10 months");
    }

    #[cfg(feature = "durations")]
    #[test]
    fn test_explicit_end_date() {
        let today = date(2030, 1, 1);
        let e = elapsed_between("June 2018", "September 2021", today).unwrap();
        assert_eq!(e, Elapsed { years: 3, months: 3 });
    }

    #[cfg(feature = "durations")]
    #[test]
    fn test_identical_dates_give_no_phrase() {
        let today = date(2024, 5, 1);
        assert_eq!(elapsed_between("May 2023", "May 2023", today), None);
        let range = DateRange {
            start: "May 2023".into(),
            end: EndDate::On("May 2023".into()),
        };
        assert_eq!(duration_phrase(&range, today, true), None);
    }

    #[cfg(feature = "durations")]
    #[test]
    fn test_present_duration_never_decreases() {
        let mut day = date(2020, 3, 1);
        let mut previous = 0;
        while day < date(2023, 6, 1) {
            let months = elapsed_between("March 2020", "Present", day)
                .map(|e| e.total_months())
                .unwrap_or(0);
            assert!(months >= previous, "{day}: {months} < {previous}");
            previous = months;
            day = day.succ_opt().unwrap();
        }
        assert_eq!(previous, 38);
    }

    #[test]
    fn test_disabled_phrase_is_none() {
        let range = DateRange {
            start: "March 2020".into(),
            end: EndDate::Present("Present".into()),
        };
        assert_eq!(duration_phrase(&range, date(2022, 1, 15), false), None);
    }

    #[test]
    fn test_unparseable_dates_degrade_to_none() {
        let range = DateRange {
            start: "the before times".into(),
            end: EndDate::Present("Present".into()),
        };
        assert_eq!(duration_phrase(&range, date(2022, 1, 15), true), None);
        let open = DateRange {
            start: "2019".into(),
            end: EndDate::Unspecified,
        };
        assert_eq!(duration_phrase(&open, date(2022, 1, 15), true), None);
    }
}
