//! Calendar date display and age arithmetic.
//!
//! Dates are `chrono::NaiveDate` values end to end. Strings coming from the
//! API or from users are parsed lexically into calendar dates; nothing here
//! converts through a timestamp, so a date never shifts across a time zone
//! boundary.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};

const DISPLAY_FORMAT: &str = "%d/%m/%Y";
const INPUT_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Today's calendar date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Render a date as `DD/MM/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Render a date in the canonical `YYYY-MM-DD` form used by input fields and API payloads.
pub fn format_date_for_input(date: NaiveDate) -> String {
    date.format(INPUT_FORMAT).to_string()
}

/// Render a timestamp as `DD/MM/YYYY HH:MM`.
pub fn format_date_time(date_time: NaiveDateTime) -> String {
    date_time.format(DISPLAY_DATE_TIME_FORMAT).to_string()
}

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD`, an ISO timestamp whose date part is taken as-is
/// (`2024-06-15T23:30:00-03:00` is June 15th), and the display form
/// `DD/MM/YYYY`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let date_part = match trimmed.find(|c| c == 'T' || c == ' ') {
        Some(idx) => &trimmed[..idx],
        None => trimmed,
    };

    NaiveDate::parse_from_str(date_part, INPUT_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(date_part, DISPLAY_FORMAT))
        .ok()
}

/// String-level `format_date`: empty input gives `""`, unparseable input is returned unchanged.
pub fn format_date_str(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    parse_date(input)
        .map(format_date)
        .unwrap_or_else(|| input.to_string())
}

/// String-level `format_date_for_input`, with the same fallbacks as [`format_date_str`].
pub fn format_date_for_input_str(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    parse_date(input)
        .map(format_date_for_input)
        .unwrap_or_else(|| input.to_string())
}

/// Completed years between `birth` and `today`.
///
/// One year is subtracted when `today` falls before this year's birthday.
pub fn calculate_age(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// [`calculate_age`] for an ISO birth date string. `None` when the date does not parse.
pub fn calculate_age_from_iso(birth: &str, today: NaiveDate) -> Option<i32> {
    parse_date(birth).map(|birth| calculate_age(birth, today))
}

/// Days from `today` until the next occurrence of the birthday (0 when it is today).
///
/// A February 29th birthday is observed on February 28th in common years.
pub fn days_until_birthday(birth: NaiveDate, today: NaiveDate) -> Option<i64> {
    let this_year = birthday_in_year(birth, today.year())?;
    let next = if this_year < today {
        birthday_in_year(birth, today.year() + 1)?
    } else {
        this_year
    };
    Some((next - today).num_days())
}

fn birthday_in_year(birth: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, birth.month(), birth.day() - 1))
}
