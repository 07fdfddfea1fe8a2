// Calendar date parsing
//
// Birth dates arrive as free text from spreadsheets and JSON bodies.
// Parsing is deliberately strict about day/month order: a date such as
// 03/04/2000 is rejected instead of guessed.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Failure to turn a string into a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("date is empty")]
    Empty,
    #[error("date '{0}' is ambiguous: day and month order cannot be determined")]
    Ambiguous(String),
    #[error("date '{0}' is not in a recognized format")]
    Unrecognized(String),
}

/// Date-time layouts whose date part is kept.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts that start with the year.
const YEAR_FIRST_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Date-only layouts with a month name and a trailing year.
const MONTH_NAME_FORMATS: &[&str] = &["%d %b %Y", "%b %d, %Y"];

/// chrono's `%Y` takes a year of any width, so every layout is gated on a
/// four digit year in the position it expects.
const YEAR_DIGITS: usize = 4;

/// Parse a calendar date.
///
/// Accepted, after trimming surrounding whitespace:
/// - `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY.MM.DD`
/// - ISO-8601 / RFC 3339 date-times (time and offset are discarded)
/// - `15 Jun 2000`, `June 15, 2000`
/// - `DD/MM/YYYY` or `MM/DD/YYYY` (`/`, `-` or `.` separated) when the order is
///   unambiguous, i.e. one of the first two fields is greater than 12 or both are equal
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(DateParseError::Empty);
    }

    if leading_digits(value).len() == YEAR_DIGITS {
        for format in YEAR_FIRST_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                return Ok(date);
            }
        }

        if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
            return Ok(date_time.date_naive());
        }

        for format in DATE_TIME_FORMATS {
            if let Ok(date_time) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(date_time.date());
            }
        }
    }

    if trailing_digits(value).len() == YEAR_DIGITS {
        for format in MONTH_NAME_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                return Ok(date);
            }
        }
    }

    parse_day_month_year(value)
}

fn leading_digits(value: &str) -> &str {
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    &value[..end]
}

fn trailing_digits(value: &str) -> &str {
    let start = value
        .rfind(|c: char| !c.is_ascii_digit())
        .map_or(0, |index| index + 1);
    &value[start..]
}

fn parse_day_month_year(value: &str) -> Result<NaiveDate, DateParseError> {
    let unrecognized = || DateParseError::Unrecognized(value.to_string());

    let parts: Vec<&str> = value.split(['/', '-', '.']).collect();
    let [first, second, year] = parts.as_slice() else {
        return Err(unrecognized());
    };
    if year.len() != YEAR_DIGITS || first.len() > 2 || second.len() > 2 {
        return Err(unrecognized());
    }

    let first: u32 = first.parse().map_err(|_| unrecognized())?;
    let second: u32 = second.parse().map_err(|_| unrecognized())?;
    let year: i32 = year.parse().map_err(|_| unrecognized())?;

    let (day, month) = match (first, second) {
        (a, b) if a == b => (a, b),
        (a, b) if a > 12 && b <= 12 => (a, b),
        (a, b) if b > 12 && a <= 12 => (b, a),
        (a, b) if a <= 12 && b <= 12 => {
            return Err(DateParseError::Ambiguous(value.to_string()));
        }
        _ => return Err(unrecognized()),
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(unrecognized)
}
