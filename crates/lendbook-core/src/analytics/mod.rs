//! Dashboard analytics over a lender's portfolio.
//!
//! Covers:
//! 1. **Origination buckets** -- principal and projected interest per day or
//!    month of the reporting window, zero-filled and chronological.
//! 2. **Portfolio totals** -- lent, collected, outstanding, projected interest.
//! 3. **Top borrowers** -- ranked by gross principal lent.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

pub mod buckets;
pub mod dashboard;

pub use crate::ledger::projected_interest;
pub use buckets::{bucket_key, bucket_labels, window, AnalyticsBucket, AnalyticsFilter};
pub use dashboard::{
    analyze_portfolio, top_borrowers, AnalyticsInput, AnalyticsOutput, BorrowerRanking,
    TOP_BORROWERS,
};
