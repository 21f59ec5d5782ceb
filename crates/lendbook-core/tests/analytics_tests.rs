use chrono::NaiveDate;
use lendbook_core::analytics::{analyze_portfolio, top_borrowers, AnalyticsFilter, AnalyticsInput};
use lendbook_core::ledger::{Address, Borrower, Loan, Payment, Portfolio};
use lendbook_core::{InterestType, TermUnit};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn borrower(id: &str, name: &str) -> Borrower {
    Borrower {
        id: id.into(),
        name: name.into(),
        contact: None,
        email: None,
        address: Address::default(),
        id_type: None,
        id_number: None,
        notes: None,
    }
}

fn loan(
    id: &str,
    borrower_id: &str,
    amount: Decimal,
    date: NaiveDate,
    rate: Decimal,
    term_length: i32,
    term_unit: TermUnit,
) -> Loan {
    Loan {
        id: id.into(),
        borrower_id: borrower_id.into(),
        amount,
        date_borrowed: date,
        interest_rate: rate,
        interest_type: InterestType::Monthly,
        term_length,
        term_unit,
        due_date: None,
        description: None,
    }
}

fn pay(id: &str, loan_id: &str, amount: Decimal) -> Payment {
    Payment {
        id: id.into(),
        loan_id: loan_id.into(),
        amount,
        payment_date: d(2024, 6, 1),
        notes: None,
    }
}

/// Three borrowers, loans across 2023 and 2024, some payments.
fn sample_portfolio() -> Portfolio {
    Portfolio {
        borrowers: vec![
            borrower("B1", "Andres"),
            borrower("B2", "Bea"),
            borrower("B3", "Carlo"),
        ],
        loans: vec![
            // 2024-01: 10,000 * 5% * 12 = 6,000
            loan("L1", "B1", dec!(10000), d(2024, 1, 15), dec!(5), 12, TermUnit::Months),
            // 2024-01: 4,000 * 8% * (4 / 4) = 320
            loan("L2", "B2", dec!(4000), d(2024, 1, 20), dec!(8), 4, TermUnit::Weeks),
            // 2024-03: 2,000 * 3% * 6 = 360
            loan("L3", "B2", dec!(2000), d(2024, 3, 2), dec!(3), 6, TermUnit::Months),
            // 2023-11: 6,000 * 4% * (10 / 4) = 600
            loan("L4", "B3", dec!(6000), d(2023, 11, 30), dec!(4), 10, TermUnit::Weeks),
        ],
        payments: vec![
            pay("P1", "L1", dec!(3000)),
            pay("P2", "L2", dec!(4000)),
            pay("P3", "L4", dec!(6500)),
        ],
    }
}

fn run(filter: AnalyticsFilter, as_of: NaiveDate) -> lendbook_core::analytics::AnalyticsOutput {
    let input = AnalyticsInput {
        portfolio: sample_portfolio(),
        filter,
        as_of,
    };
    analyze_portfolio(&input).unwrap().result
}

// ===========================================================================
// Buckets
// ===========================================================================

#[test]
fn test_this_year_has_twelve_zero_filled_buckets() {
    let out = run(AnalyticsFilter::ThisYear, d(2024, 8, 15));
    let labels: Vec<&str> = out.buckets.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06", "2024-07",
            "2024-08", "2024-09", "2024-10", "2024-11", "2024-12",
        ]
    );

    assert_eq!(out.buckets[0].principal, dec!(14000));
    assert_eq!(out.buckets[0].interest, dec!(6320));
    assert_eq!(out.buckets[0].loan_count, 2);
    assert_eq!(out.buckets[1].principal, Decimal::ZERO);
    assert_eq!(out.buckets[2].principal, dec!(2000));
    assert_eq!(out.buckets[2].interest, dec!(360));
    assert_eq!(out.window_principal, dec!(16000));
    assert_eq!(out.window_interest, dec!(6680));
    assert_eq!(out.period_start, d(2024, 1, 1));
    assert_eq!(out.period_end, d(2024, 12, 31));
}

#[test]
fn test_empty_year_still_has_twelve_buckets() {
    let out = run(AnalyticsFilter::ThisYear, d(2031, 2, 1));
    assert_eq!(out.buckets.len(), 12);
    assert_eq!(out.buckets[0].label, "2031-01");
    assert!(out
        .buckets
        .iter()
        .all(|b| b.principal == Decimal::ZERO && b.interest == Decimal::ZERO));
}

#[test]
fn test_last_year_window() {
    let out = run(AnalyticsFilter::LastYear, d(2024, 2, 1));
    assert_eq!(out.buckets[0].label, "2023-01");
    assert_eq!(out.buckets[10].label, "2023-11");
    assert_eq!(out.buckets[10].principal, dec!(6000));
    assert_eq!(out.buckets[10].interest, dec!(600));
    assert_eq!(out.window_principal, dec!(6000));
}

#[test]
fn test_this_month_daily_buckets() {
    let out = run(AnalyticsFilter::ThisMonth, d(2024, 1, 31));
    assert_eq!(out.buckets.len(), 31);
    assert_eq!(out.buckets[14].label, "2024-01-15");
    assert_eq!(out.buckets[14].principal, dec!(10000));
    assert_eq!(out.buckets[19].label, "2024-01-20");
    assert_eq!(out.buckets[19].interest, dec!(320));
    assert_eq!(out.window_loan_count, 2);
}

// ===========================================================================
// Portfolio-wide totals
// ===========================================================================

#[test]
fn test_totals_ignore_window() {
    let this_year = run(AnalyticsFilter::ThisYear, d(2024, 8, 15));
    let last_year = run(AnalyticsFilter::LastYear, d(2024, 8, 15));

    for out in [&this_year, &last_year] {
        // 6000 + 320 + 360 + 600
        assert_eq!(out.total_interest, dec!(7280));
        assert_eq!(out.total_loaned, dec!(22000));
        assert_eq!(out.total_collected, dec!(13500));
        assert_eq!(out.total_outstanding, dec!(8500));
        assert_eq!(out.loan_count, 4);
        // L2 exactly paid, L4 overpaid
        assert_eq!(out.paid_loans, 2);
        assert_eq!(out.active_loans, 2);
        assert_eq!(out.borrower_count, 3);
    }
    assert_eq!(this_year.collection_rate, dec!(0.6136));
}

#[test]
fn test_analytics_idempotent() {
    let input = AnalyticsInput {
        portfolio: sample_portfolio(),
        filter: AnalyticsFilter::ThisYear,
        as_of: d(2024, 8, 15),
    };
    let first = analyze_portfolio(&input).unwrap();
    let second = analyze_portfolio(&input).unwrap();
    assert_eq!(first.result, second.result);
    assert_eq!(
        serde_json::to_string(&first.result).unwrap(),
        serde_json::to_string(&second.result).unwrap()
    );
}

// ===========================================================================
// Top borrowers
// ===========================================================================

#[test]
fn test_top_five_by_gross_principal() {
    let totals = [dec!(5000), dec!(3000), dec!(9000), dec!(1000), dec!(7000), dec!(2000)];
    let mut portfolio = Portfolio::default();
    for (i, total) in totals.iter().enumerate() {
        let id = format!("B{i}");
        portfolio.borrowers.push(borrower(&id, &format!("Borrower {i}")));
        portfolio.loans.push(loan(
            &format!("L{i}"),
            &id,
            *total,
            d(2024, 1, 1),
            dec!(5),
            1,
            TermUnit::Months,
        ));
    }
    // Repayments must not affect the ranking
    portfolio.payments.push(pay("P1", "L2", dec!(9000)));

    let ranked = top_borrowers(&portfolio, 5);
    let amounts: Vec<Decimal> = ranked.iter().map(|r| r.total_loaned).collect();
    assert_eq!(amounts, vec![dec!(9000), dec!(7000), dec!(5000), dec!(3000), dec!(2000)]);
    assert!(ranked.iter().all(|r| r.borrower_id != "B3"));
    assert_eq!(ranked[0].name, "Borrower 2");
}

#[test]
fn test_top_borrowers_sum_multiple_loans() {
    // Bea and Carlo tie at 6,000; Bea sorts first by name
    let out = run(AnalyticsFilter::ThisYear, d(2024, 8, 15));
    let top: Vec<(&str, Decimal, u32)> = out
        .top_borrowers
        .iter()
        .map(|r| (r.borrower_id.as_str(), r.total_loaned, r.loan_count))
        .collect();
    assert_eq!(
        top,
        vec![("B1", dec!(10000), 1), ("B2", dec!(6000), 2), ("B3", dec!(6000), 1)]
    );
}

#[test]
fn test_input_from_json() {
    let json = r#"{
        "portfolio": {
            "borrowers": [{"id": "B1", "name": "Dina"}],
            "loans": [{
                "id": "L1",
                "borrower_id": "B1",
                "amount": "1500",
                "date_borrowed": "2024-05-05",
                "interest_rate": "10",
                "term_length": 3,
                "term_unit": "months"
            }]
        },
        "filter": "this_month",
        "as_of": "2024-05-31"
    }"#;
    let input: AnalyticsInput = serde_json::from_str(json).unwrap();
    let out = analyze_portfolio(&input).unwrap().result;
    assert_eq!(out.buckets[4].label, "2024-05-05");
    assert_eq!(out.buckets[4].interest, dec!(450));
    assert_eq!(out.total_outstanding, dec!(1500));
}
