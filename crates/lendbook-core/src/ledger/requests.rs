use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::balance::{checked_projected_interest, summarize_loan, LoanSummary};
use super::payments::{apply_payment, PaymentOutcome};
use super::portfolio::{BorrowerSummary, Portfolio};
use super::records::{Loan, Payment};
use crate::types::*;
use crate::{LendingError, LendingResult};

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// One loan with the payments recorded against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanLedgerInput {
    pub loan: Loan,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPreviewInput {
    pub loan: Loan,
    #[serde(default)]
    pub payments: Vec<Payment>,
    pub payment: Payment,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoansQuery {
    pub portfolio: Portfolio,
    #[serde(default)]
    pub status: Option<LoanStatus>,
    #[serde(default)]
    pub borrower_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanListing {
    pub loans: Vec<LoanSummary>,
    pub loan_count: u32,
    pub total_amount: Money,
    pub total_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerReport {
    #[serde(flatten)]
    pub summary: BorrowerSummary,
    pub can_delete: bool,
    pub loans: Vec<LoanSummary>,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Balance, status and contract figures for a single loan.
///
/// Payments recorded against other loans are skipped with a warning.
pub fn loan_summary(input: &LoanLedgerInput) -> LendingResult<ComputationOutput<LoanSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let own = own_payments(&input.loan, &input.payments, &mut warnings);
    loan_warnings(&input.loan, &mut warnings);
    let summary = summarize_loan(&input.loan, own);
    if summary.overpayment > Decimal::ZERO {
        warnings.push(format!("Loan is overpaid by {}", round_money(summary.overpayment)));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Derived Balance (amount - payments)",
        &serde_json::json!({
            "balance": "amount - sum(payments), never clamped",
            "status": "paid when balance <= 0",
            "due_date": "date_borrowed + term, clamped to month end",
        }),
        warnings,
        elapsed,
        summary,
    ))
}

/// Preview of recording a new payment; nothing is persisted.
pub fn preview_payment(
    input: &PaymentPreviewInput,
) -> LendingResult<ComputationOutput<PaymentOutcome>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.payment.loan_id != input.loan.id {
        return Err(LendingError::InvalidInput {
            field: "payment.loan_id".into(),
            reason: format!(
                "payment is for loan '{}' but the loan given is '{}'",
                input.payment.loan_id, input.loan.id
            ),
        });
    }

    let existing: Vec<Payment> = own_payments(&input.loan, &input.payments, &mut warnings)
        .cloned()
        .collect();
    let outcome = apply_payment(&input.loan, &existing, &input.payment);

    if input.payment.amount <= Decimal::ZERO {
        warnings.push("Payment amount is not positive".into());
    }
    if outcome.overpayment > Decimal::ZERO {
        warnings.push(format!(
            "Payment exceeds the remaining balance by {}",
            round_money(outcome.overpayment)
        ));
    }

    tracing::debug!(
        loan_id = %input.loan.id,
        amount = %input.payment.amount,
        transition = ?outcome.transition,
        "previewed payment"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Payment Preview",
        &serde_json::json!({
            "overpayment": "accepted, leaves a negative balance",
        }),
        warnings,
        elapsed,
        outcome,
    ))
}

/// Loans with derived balances, optionally narrowed by status and borrower.
pub fn list_loans(query: &LoansQuery) -> LendingResult<ComputationOutput<LoanListing>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    let summaries = match query.status {
        Some(status) => query.portfolio.loans_with_status(status),
        None => query.portfolio.summaries(),
    };
    let loans: Vec<LoanSummary> = summaries
        .into_iter()
        .filter(|s| query.borrower_id.as_deref().map_or(true, |id| s.borrower_id == id))
        .collect();

    let listing = LoanListing {
        loan_count: loans.len() as u32,
        total_amount: loans.iter().map(|s| s.amount).sum(),
        total_balance: loans.iter().map(|s| s.balance).sum(),
        loans,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "In-Memory Status Filter",
        &serde_json::json!({
            "status": query.status,
            "borrower_id": query.borrower_id,
        }),
        warnings,
        elapsed,
        listing,
    ))
}

/// Roll-up of one borrower's loans plus whether the record may be deleted.
pub fn borrower_report(
    portfolio: &Portfolio,
    borrower_id: &str,
) -> LendingResult<ComputationOutput<BorrowerReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let summary = portfolio
        .borrower_summary(borrower_id)
        .ok_or_else(|| LendingError::UnknownRecord {
            kind: "borrower",
            id: borrower_id.to_string(),
        })?;
    if portfolio.borrower(borrower_id).is_none() {
        warnings.push(format!(
            "Borrower '{borrower_id}' is not registered; loans found by id only"
        ));
    }

    let loans: Vec<LoanSummary> = portfolio
        .loans_for(borrower_id)
        .map(|loan| portfolio.summarize(loan))
        .collect();
    let can_delete = portfolio.can_delete_borrower(borrower_id);
    if !can_delete {
        warnings.push(format!(
            "Borrower has {} loan(s) on record and cannot be deleted",
            summary.loan_count
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Borrower Roll-Up",
        &serde_json::json!({ "borrower_id": borrower_id }),
        warnings,
        elapsed,
        BorrowerReport {
            summary,
            can_delete,
            loans,
        },
    ))
}

fn own_payments<'a>(
    loan: &'a Loan,
    payments: &'a [Payment],
    warnings: &mut Vec<String>,
) -> impl Iterator<Item = &'a Payment> + 'a {
    let foreign = payments.iter().filter(|p| p.loan_id != loan.id).count();
    if foreign > 0 {
        warnings.push(format!("{foreign} payment(s) belong to other loans and were ignored"));
    }
    payments.iter().filter(move |p| p.loan_id == loan.id)
}

fn loan_warnings(loan: &Loan, warnings: &mut Vec<String>) {
    if loan.term_length <= 0 {
        warnings.push(format!(
            "term_length is {}; no interest is projected and the due date is the borrowed date",
            loan.term_length
        ));
    }
    if checked_projected_interest(loan).is_none() {
        warnings.push("Projected interest exceeds the decimal range; reported as zero".into());
    }
}
