//! JSON-in / JSON-out N-API surface over `lendbook-core`.
//!
//! Client previews call the same functions as the CLI so figures agree to
//! the cent.

use napi::Result as NapiResult;
use napi_derive::napi;

use lendbook_core::analytics::{self, AnalyticsInput};
use lendbook_core::ledger::{self, LoanLedgerInput, LoansQuery, PaymentPreviewInput, Portfolio};
use lendbook_core::schedule::{self, ScheduleInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: ScheduleInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_summary(input_json: String) -> NapiResult<String> {
    let input: LoanLedgerInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = ledger::loan_summary(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn apply_payment(input_json: String) -> NapiResult<String> {
    let input: PaymentPreviewInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = ledger::preview_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn list_loans(input_json: String) -> NapiResult<String> {
    let input: LoansQuery = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = ledger::list_loans(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn borrower_report(portfolio_json: String, borrower_id: String) -> NapiResult<String> {
    let portfolio: Portfolio = serde_json::from_str(&portfolio_json).map_err(to_napi_error)?;
    let output = ledger::borrower_report(&portfolio, &borrower_id).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[napi]
pub fn portfolio_analytics(input_json: String) -> NapiResult<String> {
    let input: AnalyticsInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analytics::analyze_portfolio(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
