//! Timestamp and date parsing for pasted chat headers.
//!
//! Chat clients render times in a handful of shapes:
//! - bare clock times: `10:00 AM`, `14:05`, `9:03:11 pm`
//! - relative days: `Today at 10:00 AM`, `Yesterday at 4:12 PM`
//! - dated times: `Mar 15th at 10:30 AM`, `March 15, 2024 at 10:30 AM`
//! - ISO 8601 instants: `2024-03-15T10:30:00Z`
//!
//! Everything resolves to UTC; bare times are anchored to the caller's day.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use regex::Regex;

static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2}):(\d{2})(?::(\d{2}))?\s*([ap])?\.?\s*(?:m\.?)?$").unwrap()
});

static RELATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(today|yesterday)(?:\s+at|,)?\s+(.+)$").unwrap()
});

static DATED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+?)(?:\s+at|,)\s+(\d{1,2}:\d{2}.*)$").unwrap());

static WEEKDAY_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:mon|tue|tues|wed|thu|thur|thurs|fri|sat|sun)[a-z]*\.?,?\s+").unwrap()
});

static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{4}\b").unwrap());

const DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%Y-%m-%d",
    "%m/%d/%Y",
];

/// A header time, plus the day it named explicitly (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderTime {
    pub instant: DateTime<Utc>,
    /// Set when the text itself carried a day (`Mar 15th at …`,
    /// `Yesterday at …`, ISO instants). Bare clock times leave it `None`.
    pub explicit_date: Option<NaiveDate>,
}

/// Parses a clock time such as `10:00 AM`, `9:03:11 pm` or `14:05`.
pub fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    let caps = CLOCK_RE.captures(text.trim())?;
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
    let second: u32 = caps
        .get(3)
        .map_or(Some(0), |s| s.as_str().parse().ok())?;

    if let Some(meridiem) = caps.get(4) {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("p");
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }

    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Parses a header time, reporting whether it named a day explicitly.
///
/// `day` anchors bare clock times and is the reference for `Today` /
/// `Yesterday`; it also supplies the year for dates written without one.
pub fn parse_header_time(text: &str, day: NaiveDate) -> Option<HeaderTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        let instant = dt.to_utc();
        return Some(HeaderTime {
            instant,
            explicit_date: Some(instant.date_naive()),
        });
    }

    if let Some(time) = parse_clock_time(text) {
        return Some(HeaderTime {
            instant: day.and_time(time).and_utc(),
            explicit_date: None,
        });
    }

    if let Some(caps) = RELATIVE_RE.captures(text) {
        let time = parse_clock_time(caps.get(2)?.as_str())?;
        let date = if caps.get(1)?.as_str().eq_ignore_ascii_case("yesterday") {
            day.checked_sub_days(Days::new(1))?
        } else {
            day
        };
        return Some(HeaderTime {
            instant: date.and_time(time).and_utc(),
            explicit_date: Some(date),
        });
    }

    if let Some(caps) = DATED_RE.captures(text) {
        let date = parse_date_in_year(caps.get(1)?.as_str(), day.year())?;
        let time = parse_clock_time(caps.get(2)?.as_str())?;
        return Some(HeaderTime {
            instant: date.and_time(time).and_utc(),
            explicit_date: Some(date),
        });
    }

    None
}

/// Parses a header time into a UTC instant, anchoring bare times to `day`.
///
/// Returns `None` for anything unrecognised; never panics.
///
/// # Example
///
/// ```rust
/// use chatpaste::parsing::parse_slack_timestamp;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let ts = parse_slack_timestamp("10:00 AM", day).unwrap();
/// assert_eq!(ts.to_rfc3339(), "2024-03-15T10:00:00+00:00");
///
/// assert!(parse_slack_timestamp("😄garbled", day).is_none());
/// ```
pub fn parse_slack_timestamp(text: &str, day: NaiveDate) -> Option<DateTime<Utc>> {
    parse_header_time(text, day).map(|t| t.instant)
}

/// Parses a calendar date that includes a year.
///
/// Accepts `March 15, 2024`, `Friday, March 15th, 2024`, `Mar 15 2024`,
/// `15 March 2024`, `2024-03-15` and `03/15/2024`.
///
/// # Example
///
/// ```rust
/// use chatpaste::parsing::parse_date;
///
/// let date = parse_date("Friday, March 15th, 2024").unwrap();
/// assert_eq!(date.to_string(), "2024-03-15");
/// assert!(parse_date("not a date").is_none());
/// ```
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let normalized = normalize_date(text);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&normalized, fmt).ok())
}

/// Like [`parse_date`], but fills in `year` when the text has none.
pub fn parse_date_in_year(text: &str, year: i32) -> Option<NaiveDate> {
    if YEAR_RE.is_match(text) {
        return parse_date(text);
    }
    let normalized = normalize_date(text);
    parse_date(&format!("{normalized}, {year}"))
}

fn normalize_date(text: &str) -> String {
    let text = text.trim().trim_matches(',').trim();
    let text = WEEKDAY_PREFIX_RE.replace(text, "");
    let text = ORDINAL_RE.replace_all(&text, "$1");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
