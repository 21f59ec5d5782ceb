//! Balance and status derivation.
//!
//! Nothing here is cached: callers recompute against whatever payment set is
//! visible at call time.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::records::{Loan, Payment};
use crate::dates::add_periods;
use crate::types::*;

/// `loan.amount - Σ payments.amount`. Goes negative on overpayment.
pub fn compute_balance<'a>(loan: &Loan, payments: impl IntoIterator<Item = &'a Payment>) -> Money {
    loan.amount - total_paid(payments)
}

pub fn total_paid<'a>(payments: impl IntoIterator<Item = &'a Payment>) -> Money {
    payments.into_iter().map(|p| p.amount).sum()
}

/// `Paid` iff the balance is at or below zero.
pub fn compute_status(balance: Money) -> LoanStatus {
    if balance <= Decimal::ZERO {
        LoanStatus::Paid
    } else {
        LoanStatus::Active
    }
}

/// `date_borrowed + term_length` months or weeks.
///
/// A non-positive term is due on the day it was borrowed.
pub fn due_date(
    date_borrowed: NaiveDate,
    term_length: i32,
    term_unit: TermUnit,
) -> Option<NaiveDate> {
    let periods = u32::try_from(term_length).unwrap_or(0);
    add_periods(date_borrowed, periods, term_unit)
}

/// Term expressed in months; four weeks count as one month.
pub fn effective_term_months(term_length: i32, term_unit: TermUnit) -> Decimal {
    if term_length <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(term_length) / term_unit.periods_per_month()
}

/// Full-term flat interest on a loan, unrounded.
///
/// `amount * rate% * term_in_months`, attributed in full regardless of how
/// much of the term has elapsed. `None` when the product leaves the
/// decimal range.
pub fn checked_projected_interest(loan: &Loan) -> Option<Money> {
    let months = effective_term_months(loan.term_length, loan.term_unit);
    loan.amount
        .checked_mul(loan.interest_rate / dec!(100))?
        .checked_mul(months)
}

/// [`checked_projected_interest`], zero on overflow.
pub fn projected_interest(loan: &Loan) -> Money {
    checked_projected_interest(loan).unwrap_or(Decimal::ZERO)
}

/// Everything derived from one loan and its payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub loan_id: String,
    pub borrower_id: String,
    pub amount: Money,
    pub total_paid: Money,
    pub balance: Money,
    pub status: LoanStatus,
    pub payment_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_payment_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub total_interest: Money,
    pub total_payable: Money,
    /// Amount received beyond the principal; zero unless overpaid.
    pub overpayment: Money,
}

pub fn summarize_loan<'a>(
    loan: &Loan,
    payments: impl IntoIterator<Item = &'a Payment>,
) -> LoanSummary {
    let mut paid = Decimal::ZERO;
    let mut payment_count = 0u32;
    let mut last_payment_date: Option<NaiveDate> = None;
    for p in payments {
        paid += p.amount;
        payment_count += 1;
        last_payment_date = last_payment_date.max(Some(p.payment_date));
    }

    let balance = loan.amount - paid;
    let total_interest = round_money(projected_interest(loan));

    LoanSummary {
        loan_id: loan.id.clone(),
        borrower_id: loan.borrower_id.clone(),
        amount: loan.amount,
        total_paid: paid,
        balance,
        status: compute_status(balance),
        payment_count,
        last_payment_date,
        due_date: loan.effective_due_date(),
        total_interest,
        total_payable: loan.amount.saturating_add(total_interest),
        overpayment: (-balance).max(Decimal::ZERO),
    }
}
