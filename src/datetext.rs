//! Recognition and normalization of loosely formatted publication dates.
//!
//! Two kinds of input are handled:
//! * free text containing `<day> <month name> <year>` fragments, such as
//!   `"Received 18th October 2023; Accepted 05 Jun 2060"`, and
//! * partial ISO dates of the form `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
//!
//! Both are reduced to the canonical `YYYY-MM-DD` form. Canonical dates are
//! zero padded and big-endian, so comparing them as strings is the same as
//! comparing them chronologically. Everything downstream (filter bounds,
//! `min`/`max` aggregates, extrema) relies on that.
//!
//! ```
//! use pubcatalog::datetext::{find_day_month_year, normalize_day_month_year, normalize_partial_date};
//! let found = find_day_month_year("Received 1st Feb 1993.");
//! assert_eq!(found, vec!["1st Feb 1993"]);
//! assert_eq!(normalize_day_month_year(found[0]).unwrap(), "1993-02-01");
//! assert_eq!(normalize_partial_date("2000-03").unwrap(), "2000-03-01");
//! ```

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// English month names as (full, abbreviated), in calendar order.
///
/// This is the only month table; both the recognizer pattern and the
/// name-to-number lookup are derived from it.
pub const MONTHS: [(&str, &str); 12] = [
    ("January", "Jan"),
    ("February", "Feb"),
    ("March", "Mar"),
    ("April", "Apr"),
    ("May", "May"),
    ("June", "Jun"),
    ("July", "Jul"),
    ("August", "Aug"),
    ("September", "Sep"),
    ("October", "Oct"),
    ("November", "Nov"),
    ("December", "Dec"),
];

lazy_static! {
    // day: 1-31 with optional leading zero and ordinal suffix, year: any four digits
    static ref DAY_MONTH_YEAR: Regex = {
        let mut names: Vec<&str> = MONTHS.iter().map(|(full, _)| *full).collect();
        names.extend(MONTHS.iter().map(|(_, short)| *short));
        Regex::new(&format!(
            r"(?i)\b(?:0?[1-9]|[12][0-9]|3[01])(?:st|nd|rd|th)?\b \b(?:{})\b \b[0-9]{{4}}\b",
            names.join("|")
        ))
        .unwrap()
    };
    static ref LEADING_DIGITS: Regex = Regex::new(r"^[0-9]+").unwrap();
    static ref ISO_SHAPE: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
}

/// Why a date could not be normalized.
///
/// `Shape`, `Year`, `MonthName` and `NotIso` reject input that is not laid out
/// as a date at all. The remaining variants reject calendar-invalid dates, in
/// two stages: `Month` and `Day` name a segment that is not a number or lies
/// outside 1-12 or 1-31, then `NotACalendarDate` catches dates whose segments
/// pass on their own but do not exist together, such as `2023-02-30`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Invalid date '{0}'; must be in YYYY, YYYY-MM or YYYY-MM-DD format")]
    Shape(String),
    #[error("Invalid year '{0}'; the year must be a non-negative integer")]
    Year(String),
    #[error("Invalid month '{0}'; must be between 1 and 12")]
    Month(String),
    #[error("Invalid day '{0}'; must be between 1 and 31")]
    Day(String),
    #[error("Unknown month name '{0}'")]
    MonthName(String),
    #[error("'{0}' is not a calendar date")]
    NotACalendarDate(String),
    #[error("'{0}' is not a YYYY-MM-DD date")]
    NotIso(String),
    #[error("No dates to compare")]
    EmptySet,
}

/// Case-insensitive lookup of a full or abbreviated month name.
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|(full, short)| full.eq_ignore_ascii_case(name) || short.eq_ignore_ascii_case(name))
        .map(|i| i as u32 + 1)
}

/// Finds every `<day> <month name> <year>` fragment in `text`, left to right.
///
/// This only recognizes the shape: `"31 February 9999"` is found even though
/// it is not a date. An empty vector means nothing was found.
pub fn find_day_month_year(text: &str) -> Vec<&str> {
    DAY_MONTH_YEAR.find_iter(text).map(|m| m.as_str()).collect()
}

/// Turns a `<day> <month name> <year>` fragment into `YYYY-MM-DD`.
///
/// `"1st Feb 2010"` becomes `"2010-02-01"`. The year token is used verbatim,
/// so the assembled string must still pass the calendar check.
pub fn normalize_day_month_year(fragment: &str) -> Result<String, DateError> {
    let mut tokens = fragment.splitn(3, ' ');
    let (Some(day), Some(month), Some(year)) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(DateError::Shape(fragment.to_string()));
    };
    let day = LEADING_DIGITS
        .find(day)
        .map(|m| m.as_str())
        .ok_or_else(|| DateError::Day(day.to_string()))?;
    let month = month_number(month).ok_or_else(|| DateError::MonthName(month.to_string()))?;
    let normalized = format!("{}-{:02}-{:0>2}", year, month, day);
    parse_iso(&normalized)?;
    Ok(normalized)
}

/// Canonicalizes a date given as `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
///
/// A missing month or day defaults to `01`. Month and day are first range
/// checked on their own (1-12 and 1-31), and only then is the assembled date
/// checked against the calendar, so `2023-02-31` fails as `NotACalendarDate`
/// while `2023-02-32` fails as `Day`.
pub fn normalize_partial_date(date: &str) -> Result<String, DateError> {
    let segments: Vec<&str> = date.split('-').collect();
    if segments.len() > 3 {
        return Err(DateError::Shape(date.to_string()));
    }
    let year = integer(segments[0]).ok_or_else(|| DateError::Year(segments[0].to_string()))?;
    let month = match segments.get(1) {
        Some(segment) => {
            let month = integer(segment).ok_or_else(|| DateError::Month(segment.to_string()))?;
            if !(1..=12).contains(&month) {
                return Err(DateError::Month(segment.to_string()));
            }
            month
        }
        None => 1,
    };
    let day = match segments.get(2) {
        Some(segment) => {
            let day = integer(segment).ok_or_else(|| DateError::Day(segment.to_string()))?;
            if !(1..=31).contains(&day) {
                return Err(DateError::Day(segment.to_string()));
            }
            day
        }
        None => 1,
    };
    let normalized = format!("{:04}-{:02}-{:02}", year, month, day);
    match parse_iso(&normalized) {
        Ok(_) => Ok(normalized),
        Err(_) => Err(DateError::NotACalendarDate(normalized)),
    }
}

// digits only, so signs and whitespace are rejected
fn integer(segment: &str) -> Option<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Parses a canonical `YYYY-MM-DD` string, rejecting dates outside years 1-9999.
pub fn parse_iso(date: &str) -> Result<NaiveDate, DateError> {
    if !ISO_SHAPE.is_match(date) {
        return Err(DateError::NotIso(date.to_string()));
    }
    let calendar = || DateError::NotACalendarDate(date.to_string());
    let year: i32 = date[0..4].parse().map_err(|_| calendar())?;
    let month: u32 = date[5..7].parse().map_err(|_| calendar())?;
    let day: u32 = date[8..10].parse().map_err(|_| calendar())?;
    if year < 1 {
        return Err(calendar());
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(calendar)
}

/// Whole days from `start` to `end`; `None` unless both are canonical dates.
pub fn days_between(start: &str, end: &str) -> Option<i64> {
    let start = parse_iso(start).ok()?;
    let end = parse_iso(end).ok()?;
    Some((end - start).num_days())
}

/// The earliest of a non-empty set of canonical dates.
pub fn earliest_date<I, S>(dates: I) -> Result<String, DateError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extremum(dates, |candidate, best| candidate < best)
}

/// The latest of a non-empty set of canonical dates.
pub fn latest_date<I, S>(dates: I) -> Result<String, DateError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extremum(dates, |candidate, best| candidate > best)
}

fn extremum<I, S>(dates: I, better: impl Fn(&str, &str) -> bool) -> Result<String, DateError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut best: Option<String> = None;
    for date in dates {
        let date = date.as_ref();
        parse_iso(date)?;
        let replace = match &best {
            Some(current) => better(date, current.as_str()),
            None => true,
        };
        if replace {
            best = Some(date.to_string());
        }
    }
    best.ok_or(DateError::EmptySet)
}

/// Best-effort canonical form of a raw date as extracted from a document.
///
/// Partial ISO dates are tried first, then the first `<day> <month name> <year>`
/// fragment in the text that forms a real date.
pub fn canonical_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(date) = normalize_partial_date(raw) {
        return Some(date);
    }
    find_day_month_year(raw)
        .into_iter()
        .find_map(|fragment| normalize_day_month_year(fragment).ok())
}
