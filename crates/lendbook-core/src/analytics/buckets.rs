use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dates::{day_label, days_in_month, first_of_month, last_of_month, month_label};
use crate::error::LendingError;
use crate::types::Money;
use crate::LendingResult;

/// Reporting window for dashboard charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsFilter {
    /// One bucket per day of the reference month.
    ThisMonth,
    /// One bucket per month of the reference year.
    #[default]
    ThisYear,
    /// One bucket per month of the year before the reference year.
    LastYear,
}

impl AnalyticsFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalyticsFilter::ThisMonth => "this_month",
            AnalyticsFilter::ThisYear => "this_year",
            AnalyticsFilter::LastYear => "last_year",
        }
    }

    pub fn is_daily(self) -> bool {
        matches!(self, AnalyticsFilter::ThisMonth)
    }
}

impl fmt::Display for AnalyticsFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyticsFilter {
    type Err = LendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "this_month" => Ok(AnalyticsFilter::ThisMonth),
            "this_year" => Ok(AnalyticsFilter::ThisYear),
            "last_year" => Ok(AnalyticsFilter::LastYear),
            other => Err(LendingError::InvalidInput {
                field: "filter".into(),
                reason: format!(
                    "Unknown filter '{other}'. Valid: this_month, this_year, last_year"
                ),
            }),
        }
    }
}

/// Accumulated originations for one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsBucket {
    pub label: String,
    pub principal: Money,
    pub interest: Money,
    pub loan_count: u32,
}

impl AnalyticsBucket {
    pub fn empty(label: String) -> Self {
        AnalyticsBucket {
            label,
            principal: Decimal::ZERO,
            interest: Decimal::ZERO,
            loan_count: 0,
        }
    }
}

/// Bucket a date falls into at the filter's granularity.
pub fn bucket_key(filter: AnalyticsFilter, date: NaiveDate) -> String {
    if filter.is_daily() {
        day_label(date)
    } else {
        month_label(date)
    }
}

/// First and last day covered by the filter.
pub fn window(filter: AnalyticsFilter, as_of: NaiveDate) -> LendingResult<(NaiveDate, NaiveDate)> {
    match filter {
        AnalyticsFilter::ThisMonth => {
            let start = first_of_month(as_of.year(), as_of.month())?;
            Ok((start, last_of_month(start)?))
        }
        AnalyticsFilter::ThisYear => year_window(as_of.year()),
        AnalyticsFilter::LastYear => year_window(as_of.year() - 1),
    }
}

fn year_window(year: i32) -> LendingResult<(NaiveDate, NaiveDate)> {
    let start = first_of_month(year, 1)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| LendingError::DateError(format!("Year {year} out of range")))?;
    Ok((start, end))
}

/// Every bucket label of the window, chronological and gap-free.
pub fn bucket_labels(filter: AnalyticsFilter, as_of: NaiveDate) -> LendingResult<Vec<String>> {
    match filter {
        AnalyticsFilter::ThisMonth => {
            let (year, month) = (as_of.year(), as_of.month());
            (1..=days_in_month(year, month)?)
                .map(|day| {
                    NaiveDate::from_ymd_opt(year, month, day)
                        .map(day_label)
                        .ok_or_else(|| {
                            LendingError::DateError(format!(
                                "Invalid day {year}-{month:02}-{day:02}"
                            ))
                        })
                })
                .collect()
        }
        AnalyticsFilter::ThisYear => month_labels(as_of.year()),
        AnalyticsFilter::LastYear => month_labels(as_of.year() - 1),
    }
}

fn month_labels(year: i32) -> LendingResult<Vec<String>> {
    (1..=12)
        .map(|month| first_of_month(year, month).map(month_label))
        .collect()
}
