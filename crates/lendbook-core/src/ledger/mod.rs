//! Lending records and everything derived from them on read.
//!
//! Covers:
//! 1. **Records** -- borrowers, loans, payments as persisted by the caller.
//! 2. **Balance / status** -- `amount - Σ payments`, paid iff `<= 0`.
//! 3. **Due dates** -- borrowed date plus the term, clamped at month end.
//! 4. **Payment preview** -- before/after balance and status transition.
//! 5. **Portfolio** -- in-memory status filtering and roll-ups.
//! 6. **Requests** -- enveloped entry points used by the CLI and bindings.

pub mod balance;
pub mod payments;
pub mod portfolio;
pub mod records;
pub mod requests;

pub use balance::{
    checked_projected_interest, compute_balance, compute_status, due_date, effective_term_months,
    projected_interest, summarize_loan, total_paid, LoanSummary,
};
pub use payments::{apply_payment, PaymentOutcome, StatusTransition};
pub use portfolio::{BorrowerSummary, Portfolio};
pub use records::{Address, Borrower, Loan, Payment};
pub use requests::{
    borrower_report, list_loans, loan_summary, preview_payment, BorrowerReport, LoanLedgerInput,
    LoanListing, LoansQuery, PaymentPreviewInput,
};
