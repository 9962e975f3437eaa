use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

/// Literal shown at the date prompt once today's slot is already filled.
pub const DATE_PLACEHOLDER: &str = "yyyy-mm-dd";

// ASCII digits only; `\d` would also accept other Unicode decimal digits.
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("static regex is valid"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("'{0}' is not a valid yyyy-mm-dd date")]
    Invalid(String),
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn split_components(date: &str) -> Option<(i32, u32, u32)> {
    if !ISO_DATE.is_match(date) {
        return None;
    }

    let mut parts = date.split('-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;

    Some((year, month, day))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Checks `YYYY-MM-DD` syntax and that the day exists in the calendar.
pub fn validate_date(date: &str) -> bool {
    let Some((year, month, day)) = split_components(date) else {
        return false;
    };

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return false;
    }

    day <= days_in_month(year, month)
}

/// Parse a validated ISO date into a calendar date.
pub fn parse_date(date: &str) -> Result<NaiveDate, DateError> {
    if !validate_date(date) {
        return Err(DateError::Invalid(date.to_string()));
    }

    split_components(date)
        .and_then(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day))
        .ok_or_else(|| DateError::Invalid(date.to_string()))
}

/// Render an ISO date for display, e.g. `"Jan 05, 2025 (Sun)"`.
pub fn format_date(date: &str) -> Result<String, DateError> {
    let value = parse_date(date)?;
    Ok(value.format("%b %d, %Y (%a)").to_string())
}

pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
