use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;

use super::buckets::{bucket_key, bucket_labels, window, AnalyticsBucket, AnalyticsFilter};
use crate::ledger::{checked_projected_interest, projected_interest, Portfolio};
use crate::types::*;
use crate::LendingResult;

/// Size of the top-borrower leaderboard.
pub const TOP_BORROWERS: usize = 5;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsInput {
    pub portfolio: Portfolio,
    #[serde(default)]
    pub filter: AnalyticsFilter,
    /// Reference date that "this month" and "this year" are relative to.
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerRanking {
    pub rank: u32,
    pub borrower_id: String,
    pub name: String,
    /// Gross principal lent, not the outstanding balance.
    pub total_loaned: Money,
    pub loan_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsOutput {
    pub filter: AnalyticsFilter,
    pub as_of: NaiveDate,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Chronological, one entry per day or month of the window.
    pub buckets: Vec<AnalyticsBucket>,
    pub window_principal: Money,
    pub window_interest: Money,
    pub window_loan_count: u32,
    pub total_loaned: Money,
    pub total_collected: Money,
    pub total_outstanding: Money,
    /// Projected full-term interest over every loan, not windowed.
    pub total_interest: Money,
    pub collection_rate: Rate,
    pub loan_count: u32,
    pub active_loans: u32,
    pub paid_loans: u32,
    pub borrower_count: u32,
    pub top_borrowers: Vec<BorrowerRanking>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Dashboard figures for one lender's portfolio.
///
/// Each loan's full projected interest is attributed to the bucket it was
/// originated in. Portfolio-wide totals ignore the window.
pub fn analyze_portfolio(
    input: &AnalyticsInput,
) -> LendingResult<ComputationOutput<AnalyticsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let portfolio = &input.portfolio;

    let labels = bucket_labels(input.filter, input.as_of)?;
    let (period_start, period_end) = window(input.filter, input.as_of)?;

    let mut accumulated: BTreeMap<String, AnalyticsBucket> = labels
        .iter()
        .map(|label| (label.clone(), AnalyticsBucket::empty(label.clone())))
        .collect();

    let mut total_interest = Decimal::ZERO;
    for loan in &portfolio.loans {
        let interest = projected_interest(loan);
        total_interest = total_interest.saturating_add(interest);

        if let Some(bucket) = accumulated.get_mut(&bucket_key(input.filter, loan.date_borrowed)) {
            bucket.principal += loan.amount;
            bucket.interest = bucket.interest.saturating_add(interest);
            bucket.loan_count += 1;
        }
    }

    let buckets: Vec<AnalyticsBucket> = labels
        .iter()
        .filter_map(|label| accumulated.remove(label))
        .map(|b| AnalyticsBucket {
            principal: round_money(b.principal),
            interest: round_money(b.interest),
            ..b
        })
        .collect();

    let window_principal: Money = buckets.iter().map(|b| b.principal).sum();
    let window_interest: Money = buckets.iter().map(|b| b.interest).sum();
    let window_loan_count: u32 = buckets.iter().map(|b| b.loan_count).sum();

    let summaries = portfolio.summaries();
    let paid_loans = summaries.iter().filter(|s| s.status == LoanStatus::Paid).count() as u32;
    let loan_count = summaries.len() as u32;

    let total_loaned = portfolio.total_loaned();
    let total_collected = portfolio.total_collected();
    let collection_rate = if total_loaned > Decimal::ZERO {
        (total_collected / total_loaned).round_dp(4)
    } else {
        Decimal::ZERO
    };

    collect_data_warnings(portfolio, &mut warnings);

    let top_borrowers = top_borrowers(portfolio, TOP_BORROWERS);

    tracing::debug!(
        filter = %input.filter,
        as_of = %input.as_of,
        loans = loan_count,
        buckets = buckets.len(),
        window_loans = window_loan_count,
        "aggregated portfolio analytics"
    );

    let output = AnalyticsOutput {
        filter: input.filter,
        as_of: input.as_of,
        period_start,
        period_end,
        buckets,
        window_principal,
        window_interest,
        window_loan_count,
        total_loaned: round_money(total_loaned),
        total_collected: round_money(total_collected),
        total_outstanding: round_money(total_loaned - total_collected),
        total_interest: round_money(total_interest),
        collection_rate,
        loan_count,
        active_loans: loan_count - paid_loans,
        paid_loans,
        borrower_count: portfolio.borrowers.len() as u32,
        top_borrowers,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Origination Buckets with Projected Flat Interest",
        &serde_json::json!({
            "filter": input.filter,
            "as_of": input.as_of,
            "interest": "amount * rate% * term_months, attributed to origination bucket",
            "weekly_term": "term_length / 4 months",
            "top_borrowers": TOP_BORROWERS,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Borrowers ranked by gross principal lent, largest first.
///
/// Registered borrowers without loans rank with zero. Ties break by name,
/// then id.
pub fn top_borrowers(portfolio: &Portfolio, limit: usize) -> Vec<BorrowerRanking> {
    let mut totals: HashMap<&str, (Money, u32)> = portfolio
        .borrowers
        .iter()
        .map(|b| (b.id.as_str(), (Decimal::ZERO, 0)))
        .collect();
    for loan in &portfolio.loans {
        let entry = totals.entry(loan.borrower_id.as_str()).or_insert((Decimal::ZERO, 0));
        entry.0 += loan.amount;
        entry.1 += 1;
    }

    let mut ranked: Vec<BorrowerRanking> = totals
        .into_iter()
        .map(|(id, (total_loaned, loan_count))| BorrowerRanking {
            rank: 0,
            borrower_id: id.to_string(),
            name: portfolio
                .borrower(id)
                .map(|b| b.name.clone())
                .unwrap_or_else(|| id.to_string()),
            total_loaned,
            loan_count,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.total_loaned
            .cmp(&a.total_loaned)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.borrower_id.cmp(&b.borrower_id))
    });
    ranked.truncate(limit);
    for (i, r) in ranked.iter_mut().enumerate() {
        r.rank = i as u32 + 1;
    }
    ranked
}

fn collect_data_warnings(portfolio: &Portfolio, warnings: &mut Vec<String>) {
    let no_term = portfolio.loans.iter().filter(|l| l.term_length <= 0).count();
    if no_term > 0 {
        warnings.push(format!("{no_term} loan(s) with term_length <= 0 contribute no interest"));
    }

    let overflowed = portfolio
        .loans
        .iter()
        .filter(|l| checked_projected_interest(l).is_none())
        .count();
    if overflowed > 0 {
        warnings.push(format!(
            "{overflowed} loan(s) with projected interest beyond the decimal range counted as zero"
        ));
    }

    let borrower_ids: HashSet<&str> = portfolio.borrowers.iter().map(|b| b.id.as_str()).collect();
    let unknown = portfolio
        .loans
        .iter()
        .filter(|l| !borrower_ids.contains(l.borrower_id.as_str()))
        .count();
    if unknown > 0 {
        warnings.push(format!("{unknown} loan(s) reference borrowers missing from the portfolio"));
    }

    let loan_ids: HashSet<&str> = portfolio.loans.iter().map(|l| l.id.as_str()).collect();
    let orphans = portfolio
        .payments
        .iter()
        .filter(|p| !loan_ids.contains(p.loan_id.as_str()))
        .count();
    if orphans > 0 {
        warnings.push(format!("{orphans} payment(s) reference unknown loans and were ignored"));
    }
}
