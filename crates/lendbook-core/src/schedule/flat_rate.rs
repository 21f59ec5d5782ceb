use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::dates::add_periods;
use crate::ledger::Loan;
use crate::types::*;
use crate::{LendingError, LendingResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One row of a repayment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationLine {
    pub payment_no: u32,
    pub date: NaiveDate,
    pub amount: Money,
    pub principal: Money,
    pub interest: Money,
    /// Principal still owed after this payment, floored at zero.
    pub balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    /// Percent per month (per four weeks for weekly terms).
    pub interest_rate: Percent,
    pub term_length: i32,
    #[serde(default)]
    pub term_unit: TermUnit,
    pub start_date: NaiveDate,
}

impl ScheduleInput {
    pub fn from_loan(loan: &Loan) -> Self {
        ScheduleInput {
            principal: loan.amount,
            interest_rate: loan.interest_rate,
            term_length: loan.term_length,
            term_unit: loan.term_unit,
            start_date: loan.date_borrowed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub lines: Vec<AmortizationLine>,
    pub rate_per_period: Rate,
    pub principal_per_period: Money,
    pub interest_per_period: Money,
    pub payment_per_period: Money,
    /// Sum of the rounded line amounts.
    pub total_payment: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_due: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Flat-rate math
// ---------------------------------------------------------------------------

/// Interest rate applied each period, as a decimal.
///
/// The loan rate is monthly; a weekly period takes a quarter of it.
pub fn rate_per_period(interest_rate: Percent, term_unit: TermUnit) -> Rate {
    interest_rate / dec!(100) / term_unit.periods_per_month()
}

/// Lines reserved up front. Longer terms grow as far as the dates allow.
const PREALLOCATED_LINES: u32 = 1200;

/// Unrounded principal, interest and payment per period.
///
/// `None` when a figure leaves the decimal range.
fn period_amounts(
    principal: Money,
    interest_rate: Percent,
    periods: u32,
    term_unit: TermUnit,
) -> Option<(Money, Money, Money)> {
    let principal_per_period = principal.checked_div(Decimal::from(periods))?;
    let interest_per_period = principal.checked_mul(rate_per_period(interest_rate, term_unit))?;
    let payment_per_period = principal_per_period.checked_add(interest_per_period)?;
    Some((principal_per_period, interest_per_period, payment_per_period))
}

/// Flat-rate (add-on) schedule.
///
/// Principal is repaid in equal slices and every period carries the same
/// interest, `principal * rate_per_period`, computed on the original
/// principal. Amounts are rounded per line. A non-positive term yields an
/// empty schedule, as does a principal whose per-period figures overflow.
/// Dates past chrono's range end it early.
pub fn flat_rate_schedule(
    principal: Money,
    interest_rate: Percent,
    term_length: i32,
    term_unit: TermUnit,
    start_date: NaiveDate,
) -> Vec<AmortizationLine> {
    let periods = match u32::try_from(term_length) {
        Ok(n) if n > 0 => n,
        _ => return Vec::new(),
    };

    let Some((principal_per_period, interest_per_period, payment_per_period)) =
        period_amounts(principal, interest_rate, periods, term_unit)
    else {
        tracing::warn!(%principal, %interest_rate, "per-period amounts overflow; empty schedule");
        return Vec::new();
    };

    let amount = round_money(payment_per_period);
    let principal_line = round_money(principal_per_period);
    let interest_line = round_money(interest_per_period);

    let mut lines = Vec::with_capacity(periods.min(PREALLOCATED_LINES) as usize);
    let mut balance = principal;

    for payment_no in 1..=periods {
        let Some(date) = add_periods(start_date, payment_no, term_unit) else {
            tracing::warn!(payment_no, %start_date, "schedule date out of range; truncating");
            break;
        };
        balance -= principal_per_period;
        lines.push(AmortizationLine {
            payment_no,
            date,
            amount,
            principal: principal_line,
            interest: interest_line,
            balance: round_money(balance.max(Decimal::ZERO)),
        });
    }

    lines
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Build the authoritative repayment schedule for a loan.
///
/// Fails when per-period figures or totals leave the decimal range.
pub fn build_schedule(
    input: &ScheduleInput,
) -> LendingResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.term_length <= 0 {
        warnings.push(format!(
            "term_length is {}; at least one period is needed, schedule is empty",
            input.term_length
        ));
    }
    if input.principal <= Decimal::ZERO {
        warnings.push("Principal is not positive; every line repays nothing".into());
    }
    if input.interest_rate < Decimal::ZERO {
        warnings.push("Negative interest rate produces negative interest per period".into());
    }

    if let Ok(periods @ 1..) = u32::try_from(input.term_length) {
        let amounts =
            period_amounts(input.principal, input.interest_rate, periods, input.term_unit);
        if amounts.is_none() {
            return Err(out_of_range("per-period amounts"));
        }
    }

    let lines = flat_rate_schedule(
        input.principal,
        input.interest_rate,
        input.term_length,
        input.term_unit,
        input.start_date,
    );

    if input.term_length > 0 && lines.len() < input.term_length as usize {
        warnings.push(format!(
            "Schedule truncated after {} of {} periods: dates out of range",
            lines.len(),
            input.term_length
        ));
    }

    let (principal_per_period, interest_per_period, payment_per_period) = match lines.first() {
        Some(line) => (line.principal, line.interest, line.amount),
        None => {
            let zero = round_money(Decimal::ZERO);
            (zero, zero, zero)
        }
    };

    let total_payment = checked_total(&lines, |l| l.amount)?;
    let total_principal = checked_total(&lines, |l| l.principal)?;
    let total_interest = checked_total(&lines, |l| l.interest)?;

    tracing::debug!(
        term_length = input.term_length,
        term_unit = %input.term_unit,
        lines = lines.len(),
        %total_payment,
        "built flat-rate schedule"
    );

    let output = ScheduleOutput {
        first_due: lines.first().map(|l| l.date),
        maturity_date: lines.last().map(|l| l.date),
        lines,
        rate_per_period: rate_per_period(input.interest_rate, input.term_unit),
        principal_per_period,
        interest_per_period,
        payment_per_period,
        total_payment,
        total_principal,
        total_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Flat-Rate (Add-On) Amortization",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "interest_rate_pct": input.interest_rate.to_string(),
            "term_length": input.term_length,
            "term_unit": input.term_unit,
            "weekly_rate": "monthly rate / 4",
            "rounding": "2dp per line, half away from zero; totals sum rounded lines",
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Sum of one rounded column across the schedule.
fn checked_total(
    lines: &[AmortizationLine],
    column: impl Fn(&AmortizationLine) -> Money,
) -> LendingResult<Money> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(column(line)))
        .ok_or_else(|| out_of_range("schedule totals"))
}

fn out_of_range(what: &str) -> LendingError {
    LendingError::InvalidInput {
        field: "principal".into(),
        reason: format!("{what} exceed the decimal range"),
    }
}
