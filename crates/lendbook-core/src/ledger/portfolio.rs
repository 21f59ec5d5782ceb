use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::balance::{summarize_loan, LoanSummary};
use super::records::{Borrower, Loan, Payment};
use crate::types::*;

/// A point-in-time snapshot of one lender's records.
///
/// Already scoped to the owning user by the caller; nothing in the engine
/// filters by owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(default)]
    pub borrowers: Vec<Borrower>,
    #[serde(default)]
    pub loans: Vec<Loan>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// Per-borrower roll-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerSummary {
    pub borrower_id: String,
    pub name: String,
    pub loan_count: u32,
    pub active_loans: u32,
    pub total_loaned: Money,
    pub total_paid: Money,
    pub outstanding: Money,
}

impl Portfolio {
    pub fn borrower(&self, borrower_id: &str) -> Option<&Borrower> {
        self.borrowers.iter().find(|b| b.id == borrower_id)
    }

    pub fn payments_for<'a>(&'a self, loan_id: &'a str) -> impl Iterator<Item = &'a Payment> + 'a {
        self.payments.iter().filter(move |p| p.loan_id == loan_id)
    }

    pub fn loans_for<'a>(&'a self, borrower_id: &'a str) -> impl Iterator<Item = &'a Loan> + 'a {
        self.loans.iter().filter(move |l| l.borrower_id == borrower_id)
    }

    /// Payments grouped by loan id, in input order.
    pub fn payment_index(&self) -> HashMap<&str, Vec<&Payment>> {
        let mut index: HashMap<&str, Vec<&Payment>> = HashMap::new();
        for p in &self.payments {
            index.entry(p.loan_id.as_str()).or_default().push(p);
        }
        index
    }

    pub fn summarize(&self, loan: &Loan) -> LoanSummary {
        summarize_loan(loan, self.payments_for(&loan.id))
    }

    /// One summary per loan, in loan order.
    pub fn summaries(&self) -> Vec<LoanSummary> {
        let index = self.payment_index();
        self.loans
            .iter()
            .map(|loan| {
                let payments = index.get(loan.id.as_str()).map(Vec::as_slice).unwrap_or_default();
                summarize_loan(loan, payments.iter().copied())
            })
            .collect()
    }

    /// Loans whose derived status matches, computed in memory.
    pub fn loans_with_status(&self, status: LoanStatus) -> Vec<LoanSummary> {
        self.summaries()
            .into_iter()
            .filter(|s| s.status == status)
            .collect()
    }

    pub fn total_loaned(&self) -> Money {
        self.loans.iter().map(|l| l.amount).sum()
    }

    /// Payments received on loans in this portfolio. Orphan payments are ignored.
    pub fn total_collected(&self) -> Money {
        let loan_ids: HashSet<&str> = self.loans.iter().map(|l| l.id.as_str()).collect();
        self.payments
            .iter()
            .filter(|p| loan_ids.contains(p.loan_id.as_str()))
            .map(|p| p.amount)
            .sum()
    }

    /// Net receivable: everything lent minus everything collected.
    pub fn total_outstanding(&self) -> Money {
        self.total_loaned() - self.total_collected()
    }

    /// `None` when the borrower is unknown and has no loans.
    pub fn borrower_summary(&self, borrower_id: &str) -> Option<BorrowerSummary> {
        let borrower = self.borrower(borrower_id);
        let loans: Vec<&Loan> = self.loans_for(borrower_id).collect();
        if borrower.is_none() && loans.is_empty() {
            return None;
        }

        let mut summary = BorrowerSummary {
            borrower_id: borrower_id.to_string(),
            name: borrower.map(|b| b.name.clone()).unwrap_or_else(|| borrower_id.to_string()),
            loan_count: 0,
            active_loans: 0,
            total_loaned: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            outstanding: Decimal::ZERO,
        };
        for loan in loans {
            let s = self.summarize(loan);
            summary.loan_count += 1;
            if s.status == LoanStatus::Active {
                summary.active_loans += 1;
            }
            summary.total_loaned += s.amount;
            summary.total_paid += s.total_paid;
            summary.outstanding += s.balance;
        }
        Some(summary)
    }

    /// Borrowers with loans on record cannot be deleted.
    pub fn can_delete_borrower(&self, borrower_id: &str) -> bool {
        self.loans_for(borrower_id).next().is_none()
    }
}
