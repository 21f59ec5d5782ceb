use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::{compute_balance, compute_status};
use super::records::{Loan, Payment};
use crate::types::*;

/// Status change caused by a payment, for a caller-side audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTransition {
    Unchanged,
    /// Active -> Paid
    Settled,
    /// Paid -> Active
    Reopened,
}

impl StatusTransition {
    pub fn between(before: LoanStatus, after: LoanStatus) -> Self {
        match (before, after) {
            (LoanStatus::Active, LoanStatus::Paid) => StatusTransition::Settled,
            (LoanStatus::Paid, LoanStatus::Active) => StatusTransition::Reopened,
            _ => StatusTransition::Unchanged,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub loan_id: String,
    pub payment_amount: Money,
    pub balance_before: Money,
    pub balance_after: Money,
    pub status_before: LoanStatus,
    pub status_after: LoanStatus,
    /// Portion of this payment beyond what was still owed.
    pub overpayment: Money,
    pub transition: StatusTransition,
}

/// Effect of recording `payment` against `loan`.
///
/// Overpayments are accepted; they leave a negative balance and count as
/// paid. Nothing is persisted.
pub fn apply_payment(loan: &Loan, existing: &[Payment], payment: &Payment) -> PaymentOutcome {
    let balance_before = compute_balance(loan, existing);
    let balance_after = compute_balance(loan, existing.iter().chain(std::iter::once(payment)));
    let status_before = compute_status(balance_before);
    let status_after = compute_status(balance_after);

    let still_owed = balance_before.max(Decimal::ZERO);
    let overpayment = (payment.amount - still_owed).max(Decimal::ZERO);

    PaymentOutcome {
        loan_id: loan.id.clone(),
        payment_amount: payment.amount,
        balance_before,
        balance_after,
        status_before,
        status_after,
        overpayment,
        transition: StatusTransition::between(status_before, status_after),
    }
}
