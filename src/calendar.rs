//! Calendar arithmetic for policy terms
//!
//! Anniversaries are month-clamped (a contract written on Jan 31 has its
//! monthly due days on Feb 28/29, Mar 31, ...), so policy years vary in
//! length. Nothing here assumes a fixed 365-day year.

use chrono::{Datelike, Days, NaiveDate};

/// Reference date used when an input date cannot be parsed.
pub const REFERENCE_DATE: (i32, u32, u32) = (2020, 1, 1);

/// Fallback date for unparseable input.
pub fn reference_date() -> NaiveDate {
    let (y, m, d) = REFERENCE_DATE;
    // Constant is a valid calendar date
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Parse a date in `YYYY-MM-DD` or `YYYY.MM.DD.` form.
///
/// Unparseable input falls back to [`reference_date`]; the engine never
/// fails on a malformed date.
pub fn parse_date(text: &str) -> NaiveDate {
    let trimmed = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed.trim_end_matches('.'), "%Y.%m.%d") {
        return date;
    }
    log::warn!("unparseable date {:?}, using reference date", text);
    reference_date()
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_y, next_m) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = NaiveDate::from_ymd_opt(next_y, next_m, 1);
    match (first, next) {
        (Some(a), Some(b)) => (b - a).num_days() as u32,
        _ => 30,
    }
}

/// Add `months` to `date`, clamping the day-of-month to the target month's
/// last day (Jan 31 + 1 month = Feb 28/29).
pub fn add_months_clamped(date: NaiveDate, months: i32) -> NaiveDate {
    let zero_based = date.year() * 12 + date.month0() as i32 + months;
    let year = zero_based.div_euclid(12);
    let month = zero_based.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(reference_date)
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// The date `offset` days after `start`.
pub fn date_at_offset(start: NaiveDate, offset: i64) -> NaiveDate {
    if offset >= 0 {
        start
            .checked_add_days(Days::new(offset as u64))
            .unwrap_or(start)
    } else {
        start
            .checked_sub_days(Days::new(offset.unsigned_abs()))
            .unwrap_or(start)
    }
}
