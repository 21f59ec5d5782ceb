use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::LendingError;
use crate::types::TermUnit;
use crate::LendingResult;

/// `start` shifted forward by `periods` of `unit`.
///
/// Always measured from `start`, never chained from a previous result, so a
/// month-end start does not drift (Jan 31 -> Feb 29 -> Mar 31). Month
/// arithmetic clamps to the last day of the target month. Returns `None`
/// outside chrono's representable range.
pub fn add_periods(start: NaiveDate, periods: u32, unit: TermUnit) -> Option<NaiveDate> {
    match unit {
        TermUnit::Months => start.checked_add_months(Months::new(periods)),
        TermUnit::Weeks => start.checked_add_days(Days::new(u64::from(periods) * 7)),
    }
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> LendingResult<u32> {
    let first = first_of_month(year, month)?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or_else(|| LendingError::DateError(format!("{year}-{month:02} has no successor")))?;
    Ok((next - first).num_days() as u32)
}

pub fn first_of_month(year: i32, month: u32) -> LendingResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| LendingError::DateError(format!("Invalid month {year}-{month:02}")))
}

/// Last calendar day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> LendingResult<NaiveDate> {
    let days = days_in_month(date.year(), date.month())?;
    NaiveDate::from_ymd_opt(date.year(), date.month(), days)
        .ok_or_else(|| LendingError::DateError(format!("Invalid month end for {date}")))
}

/// `YYYY-MM`
pub fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// `YYYY-MM-DD`
pub fn day_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}
