use chrono::NaiveDate;
use lendbook_core::schedule::{build_schedule, flat_rate_schedule, ScheduleInput};
use lendbook_core::TermUnit;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ===========================================================================
// Flat-rate schedule known answers
// ===========================================================================

#[test]
fn test_monthly_known_answer() {
    // 12,000 at 5% per month over 12 months
    let lines = flat_rate_schedule(dec!(12000), dec!(5), 12, TermUnit::Months, d(2024, 1, 1));
    assert_eq!(lines.len(), 12);

    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line.payment_no, i as u32 + 1);
        assert_eq!(line.principal, dec!(1000.00));
        assert_eq!(line.interest, dec!(600.00));
        assert_eq!(line.amount, dec!(1600.00));
    }

    assert_eq!(lines[0].date, d(2024, 2, 1));
    assert_eq!(lines[0].balance, dec!(11000));
    assert_eq!(lines[11].date, d(2025, 1, 1));
    assert_eq!(lines[11].balance, dec!(0.00));
}

#[test]
fn test_weekly_rate_is_quarter_of_monthly() {
    // 8% monthly => 2% per week; 4000 * 0.02 = 80
    let lines = flat_rate_schedule(dec!(4000), dec!(8), 4, TermUnit::Weeks, d(2024, 3, 4));
    assert_eq!(lines.len(), 4);
    for line in &lines {
        assert_eq!(line.interest, dec!(80.00));
        assert_eq!(line.principal, dec!(1000.00));
        assert_eq!(line.amount, dec!(1080.00));
    }
    assert_eq!(lines[0].date, d(2024, 3, 11));
    assert_eq!(lines[3].date, d(2024, 4, 1));
}

#[test]
fn test_zero_term_is_empty_not_error() {
    assert!(flat_rate_schedule(dec!(5000), dec!(3), 0, TermUnit::Months, d(2024, 1, 1)).is_empty());

    let out = build_schedule(&ScheduleInput {
        principal: dec!(5000),
        interest_rate: dec!(3),
        term_length: 0,
        term_unit: TermUnit::Months,
        start_date: d(2024, 1, 1),
    })
    .unwrap();
    assert!(out.result.lines.is_empty());
}

#[test]
fn test_zero_rate_has_no_interest() {
    let lines = flat_rate_schedule(dec!(600), Decimal::ZERO, 3, TermUnit::Weeks, d(2024, 1, 1));
    assert!(lines.iter().all(|l| l.interest == Decimal::ZERO));
    assert!(lines.iter().all(|l| l.amount == dec!(200)));
}

// ===========================================================================
// Totals
// ===========================================================================

#[test]
fn test_totals_sum_rounded_lines() {
    // 10,000 / 7 = 1428.5714.. => 1428.57 per line; interest 10,000 * 1.5% = 150
    let out = build_schedule(&ScheduleInput {
        principal: dec!(10000),
        interest_rate: dec!(1.5),
        term_length: 7,
        term_unit: TermUnit::Months,
        start_date: d(2024, 1, 15),
    })
    .unwrap();
    let s = &out.result;
    assert_eq!(s.payment_per_period, dec!(1578.57));
    assert_eq!(s.total_payment, dec!(1578.57) * dec!(7));
    assert_eq!(s.total_principal, dec!(9999.99));
    assert_eq!(s.total_interest, dec!(1050));
}

#[test]
fn test_schedule_sum_approximates_principal_plus_interest() {
    let cases = [
        (dec!(10000), dec!(3.25), 7, TermUnit::Months),
        (dec!(2500), dec!(6), 13, TermUnit::Weeks),
        (dec!(999.99), dec!(2.5), 9, TermUnit::Months),
        (dec!(12000), dec!(5), 12, TermUnit::Months),
    ];

    for (principal, rate, term, unit) in cases {
        let out = build_schedule(&ScheduleInput {
            principal,
            interest_rate: rate,
            term_length: term,
            term_unit: unit,
            start_date: d(2024, 1, 1),
        })
        .unwrap();
        let s = &out.result;
        let months = Decimal::from(term) / unit.periods_per_month();
        let expected = principal + principal * rate / dec!(100) * months;
        let tolerance = Decimal::from(term) * dec!(0.01);
        assert!(
            (s.total_payment - expected).abs() <= tolerance,
            "{principal} @ {rate}% x {term} {unit}: {} vs {expected}",
            s.total_payment
        );
    }
}

#[test]
fn test_month_end_start_does_not_drift() {
    let lines = flat_rate_schedule(dec!(3000), dec!(2), 4, TermUnit::Months, d(2024, 1, 31));
    let dates: Vec<NaiveDate> = lines.iter().map(|l| l.date).collect();
    assert_eq!(
        dates,
        vec![d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30), d(2024, 5, 31)]
    );
}

#[test]
fn test_huge_term_truncates_at_date_limit() {
    // Ten weeks of room before the last representable date
    let start = NaiveDate::MAX - chrono::Days::new(70);
    let out = build_schedule(&ScheduleInput {
        principal: dec!(1000),
        interest_rate: dec!(5),
        term_length: i32::MAX,
        term_unit: TermUnit::Weeks,
        start_date: start,
    })
    .unwrap();

    assert_eq!(out.result.lines.len(), 10);
    assert_eq!(out.result.maturity_date, Some(NaiveDate::MAX));
    assert!(out
        .warnings
        .iter()
        .any(|w| w.starts_with("Schedule truncated after 10 of 2147483647 periods")));
}

#[test]
fn test_schedule_is_deterministic() {
    let a = flat_rate_schedule(dec!(7777.77), dec!(4.4), 9, TermUnit::Weeks, d(2024, 8, 1));
    let b = flat_rate_schedule(dec!(7777.77), dec!(4.4), 9, TermUnit::Weeks, d(2024, 8, 1));
    assert_eq!(a, b);
}

#[test]
fn test_output_serialises_money_as_strings() {
    let out = build_schedule(&ScheduleInput {
        principal: dec!(12000),
        interest_rate: dec!(5),
        term_length: 12,
        term_unit: TermUnit::Months,
        start_date: d(2024, 1, 1),
    })
    .unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["lines"][0]["amount"], "1600.00");
    assert_eq!(json["result"]["lines"][11]["balance"], "0.00");
    assert_eq!(json["result"]["lines"][0]["date"], "2024-02-01");
    assert_eq!(json["methodology"], "Flat-Rate (Add-On) Amortization");
}
