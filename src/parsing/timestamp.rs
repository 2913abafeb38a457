//! Timestamp grammar shared by every line strategy.
//!
//! Chat apps format timestamps by locale and app version. The strategies
//! capture the timestamp text of a candidate header line and hand it to
//! [`parse_timestamp`], which cleans it into a canonical shape and tries a
//! fixed list of chrono formats:
//!
//! - 12-hour (`10:30 AM`, `10:30 a.m.`, `下午3:45`) and 24-hour clocks,
//!   with or without seconds
//! - `/`, `.` and `-` date separators, two- or four-digit years
//! - year-first dates (`2024-01-15`, `2024/1/15`, `2024年1月15日`)
//! - English month names (`Jan 15, 2024`, `15 January 2024`, `... at 10:30`)
//!
//! Numeric `/` and `-` dates with the year last are ambiguous between
//! day-first and month-first. The order is decided once per export with
//! [`detect_date_order`].

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

/// Component order of numeric dates such as `01/02/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateOrder {
    /// `DD/MM/YY` (most locales)
    #[default]
    DayFirst,
    /// `MM/DD/YY` (US)
    MonthFirst,
}

/// Result of scanning an export for its numeric date order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderDetection {
    /// The order to parse with.
    pub order: DateOrder,
    /// `true` when no timestamp gave any evidence and the default was used.
    pub ambiguous: bool,
}

static AMBIGUOUS_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,2})[/-](\d{1,2})[/-](\d{2}|\d{4})\b").expect("date regex must compile")
});

static MERIDIEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d\s?[ap]\.?\s?m\b\.?|上午|下午").expect("meridiem regex must compile")
});

static DOTTED_MERIDIEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([ap])\.\s?m\.").expect("dotted meridiem regex must compile")
});

static GLUED_MERIDIEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d)([ap]m)\b").expect("glued meridiem regex must compile")
});

static AT_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+at\s+").expect("at regex must compile"));

static CJK_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2,4})年(\d{1,2})月(\d{1,2})日").expect("cjk date regex must compile")
});

const DAY_FIRST_DATES: &[&str] = &["%d/%m/%y", "%d/%m/%Y", "%d-%m-%y", "%d-%m-%Y"];

const MONTH_FIRST_DATES: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%m-%d-%y", "%m-%d-%Y"];

const UNAMBIGUOUS_DATES: &[&str] = &[
    "%d.%m.%y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%b %d %Y",
    "%d %b %Y",
];

const TIMES: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

fn build_formats(numeric: &[&str]) -> Vec<String> {
    numeric
        .iter()
        .chain(UNAMBIGUOUS_DATES)
        .flat_map(|date| TIMES.iter().map(move |time| format!("{date} {time}")))
        .collect()
}

static DAY_FIRST_FORMATS: LazyLock<Vec<String>> =
    LazyLock::new(|| build_formats(DAY_FIRST_DATES));

static MONTH_FIRST_FORMATS: LazyLock<Vec<String>> =
    LazyLock::new(|| build_formats(MONTH_FIRST_DATES));

/// Returns `true` if the timestamp text uses a 12-hour clock.
pub fn has_meridiem(raw: &str) -> bool {
    MERIDIEM.is_match(raw)
}

/// Rewrites a raw timestamp into the single-space shape the chrono formats
/// expect: no commas, no `at`, `AM`/`PM` after the time.
pub fn clean_timestamp(raw: &str) -> String {
    let mut s: String = raw
        .chars()
        .map(|c| match c {
            '\u{a0}' | '\u{202f}' | ',' | '，' => ' ',
            _ => c,
        })
        .collect();

    s = CJK_DATE.replace_all(&s, "$1/$2/$3 ").into_owned();

    for (marker, suffix) in [("上午", "AM"), ("下午", "PM")] {
        if s.contains(marker) {
            s = format!("{} {suffix}", s.replace(marker, " "));
        }
    }

    s = DOTTED_MERIDIEM
        .replace_all(&s, |caps: &regex::Captures<'_>| {
            format!("{}M", caps[1].to_ascii_uppercase())
        })
        .into_owned();
    s = GLUED_MERIDIEM.replace_all(&s, "$1 $2").into_owned();
    s = AT_WORD.replace_all(&s, " ").into_owned();

    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses a timestamp captured from an export line.
///
/// Returns `None` when no known format matches or the date does not exist
/// (e.g. `31/02/24`); callers treat such lines as continuations.
///
/// # Example
///
/// ```rust
/// use chatsift::parsing::timestamp::{DateOrder, parse_timestamp};
///
/// let us = parse_timestamp("1/15/24, 10:30 PM", DateOrder::MonthFirst).unwrap();
/// assert_eq!(us.to_rfc3339(), "2024-01-15T22:30:00+00:00");
///
/// let named = parse_timestamp("Jan 15, 2024 at 9:05 AM", DateOrder::DayFirst).unwrap();
/// assert_eq!(named.to_rfc3339(), "2024-01-15T09:05:00+00:00");
/// ```
pub fn parse_timestamp(raw: &str, order: DateOrder) -> Option<DateTime<Utc>> {
    let cleaned = clean_timestamp(raw);
    if cleaned.is_empty() {
        return None;
    }

    let formats = match order {
        DateOrder::DayFirst => &*DAY_FIRST_FORMATS,
        DateOrder::MonthFirst => &*MONTH_FIRST_FORMATS,
    };

    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&cleaned, format).ok())
        .map(|naive| naive.and_utc())
}

/// Decides the numeric date order of an export from its header timestamps.
///
/// A first component above 12 proves day-first, a second component above 12
/// proves month-first, and the majority wins. Without such evidence a 12-hour
/// clock points to the US month-first layout. With no evidence at all the
/// result is day-first and flagged as ambiguous.
///
/// # Example
///
/// ```rust
/// use chatsift::parsing::timestamp::{DateOrder, detect_date_order};
///
/// let detection = detect_date_order(["15/01/2024, 10:30", "16/01/2024, 09:00"]);
/// assert_eq!(detection.order, DateOrder::DayFirst);
/// assert!(!detection.ambiguous);
/// ```
pub fn detect_date_order<'a, I>(timestamps: I) -> OrderDetection
where
    I: IntoIterator<Item = &'a str>,
{
    let mut candidates = 0usize;
    let mut day_first = 0usize;
    let mut month_first = 0usize;
    let mut twelve_hour = 0usize;

    for ts in timestamps {
        let Some(caps) = AMBIGUOUS_DATE.captures(ts) else {
            continue;
        };
        candidates += 1;

        let first: u32 = caps[1].parse().unwrap_or(0);
        let second: u32 = caps[2].parse().unwrap_or(0);
        if first > 12 && second <= 12 {
            day_first += 1;
        } else if second > 12 && first <= 12 {
            month_first += 1;
        }
        if has_meridiem(ts) {
            twelve_hour += 1;
        }
    }

    let (order, ambiguous) = if candidates == 0 {
        (DateOrder::DayFirst, false)
    } else if day_first > month_first {
        (DateOrder::DayFirst, false)
    } else if month_first > day_first {
        (DateOrder::MonthFirst, false)
    } else if twelve_hour > 0 {
        (DateOrder::MonthFirst, false)
    } else {
        (DateOrder::DayFirst, true)
    };

    OrderDetection { order, ambiguous }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn parse(raw: &str, order: DateOrder) -> DateTime<Utc> {
        parse_timestamp(raw, order).unwrap_or_else(|| panic!("failed to parse {raw:?}"))
    }

    #[test]
    fn test_us_twelve_hour() {
        let ts = parse("1/15/24, 10:30:45 PM", DateOrder::MonthFirst);
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 1, 15));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (22, 30, 45));
    }

    #[test]
    fn test_lowercase_and_dotted_meridiem() {
        assert_eq!(parse("1/1/24, 10:00 am", DateOrder::MonthFirst).hour(), 10);
        assert_eq!(parse("1/1/24, 10:00 p.m.", DateOrder::MonthFirst).hour(), 22);
        assert_eq!(parse("1/1/24, 10:00pm", DateOrder::MonthFirst).hour(), 22);
    }

    #[test]
    fn test_narrow_no_break_space_before_meridiem() {
        let ts = parse("1/15/24, 9:05\u{202f}AM", DateOrder::MonthFirst);
        assert_eq!((ts.hour(), ts.minute()), (9, 5));
    }

    #[test]
    fn test_day_first_slash_and_dot() {
        let ts = parse("15/01/2024, 10:30", DateOrder::DayFirst);
        assert_eq!((ts.month(), ts.day()), (1, 15));

        let ts = parse("26.10.2025, 20:40", DateOrder::MonthFirst);
        assert_eq!((ts.year(), ts.month(), ts.day()), (2025, 10, 26));

        let ts = parse("15.01.24 10:30:45", DateOrder::DayFirst);
        assert_eq!(ts.year(), 2024);
    }

    #[test]
    fn test_order_changes_reading() {
        let day_first = parse("02/03/24, 10:00", DateOrder::DayFirst);
        let month_first = parse("02/03/24, 10:00", DateOrder::MonthFirst);
        assert_eq!(day_first.month(), 3);
        assert_eq!(month_first.month(), 2);
    }

    #[test]
    fn test_iso_and_cjk_dates() {
        let ts = parse("2024-01-15 10:30:00", DateOrder::DayFirst);
        assert_eq!((ts.month(), ts.day(), ts.hour()), (1, 15, 10));

        let ts = parse("2024/1/15 下午3:45", DateOrder::DayFirst);
        assert_eq!((ts.day(), ts.hour(), ts.minute()), (15, 15, 45));

        let ts = parse("2024年1月15日 上午9:00", DateOrder::DayFirst);
        assert_eq!((ts.month(), ts.day(), ts.hour()), (1, 15, 9));
    }

    #[test]
    fn test_english_month_names() {
        let ts = parse("Jan 15, 2024, 10:30 AM", DateOrder::DayFirst);
        assert_eq!((ts.month(), ts.day(), ts.hour()), (1, 15, 10));

        let ts = parse("15 January 2024 22:10", DateOrder::DayFirst);
        assert_eq!((ts.month(), ts.hour()), (1, 22));

        let ts = parse("March 3, 2024 at 7:15 PM", DateOrder::MonthFirst);
        assert_eq!((ts.month(), ts.day(), ts.hour()), (3, 3, 19));
    }

    #[test]
    fn test_invalid_timestamps() {
        assert!(parse_timestamp("", DateOrder::DayFirst).is_none());
        assert!(parse_timestamp("not a date", DateOrder::DayFirst).is_none());
        assert!(parse_timestamp("31/02/24, 10:00", DateOrder::DayFirst).is_none());
        assert!(parse_timestamp("1/1/24, 25:00", DateOrder::DayFirst).is_none());
    }

    #[test]
    fn test_detect_day_first_by_evidence() {
        let detection = detect_date_order(["03/01/24, 10:00", "13/01/24, 10:00"]);
        assert_eq!(detection.order, DateOrder::DayFirst);
        assert!(!detection.ambiguous);
    }

    #[test]
    fn test_detect_month_first_by_evidence() {
        let detection = detect_date_order(["1/13/24, 10:00", "1/14/24, 10:00"]);
        assert_eq!(detection.order, DateOrder::MonthFirst);
        assert!(!detection.ambiguous);
    }

    #[test]
    fn test_detect_month_first_by_meridiem() {
        let detection = detect_date_order(["1/1/24, 10:00 AM", "1/2/24, 10:01 AM"]);
        assert_eq!(detection.order, DateOrder::MonthFirst);
        assert!(!detection.ambiguous);
    }

    #[test]
    fn test_detect_ambiguous() {
        let detection = detect_date_order(["01/02/24, 10:00", "03/04/24, 11:00"]);
        assert_eq!(detection.order, DateOrder::DayFirst);
        assert!(detection.ambiguous);
    }

    #[test]
    fn test_detect_without_numeric_dates() {
        let detection = detect_date_order(["15.01.24, 10:00", "Jan 15, 2024 10:00"]);
        assert_eq!(detection.order, DateOrder::DayFirst);
        assert!(!detection.ambiguous);
    }
}
